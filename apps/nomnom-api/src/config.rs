use core_config::{AppInfo, FromEnv, app_info, server::ServerConfig};
use database::mongodb::MongoConfig;
use domain_nutrition::OpenFoodFactsConfig;

pub use core_config::Environment;

/// Everything the binary reads from the environment at startup
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub open_food_facts: OpenFoodFactsConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let mongodb = MongoConfig::from_env()?;
        let server = ServerConfig::from_env()?;
        let open_food_facts = OpenFoodFactsConfig::from_env()?;

        Ok(Self {
            app: app_info!(),
            mongodb,
            server,
            open_food_facts,
            environment,
        })
    }
}
