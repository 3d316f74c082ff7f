use bazaar_server::{
    cli::{handle_command_line_args, CliOutcome},
    config::ServerConfig,
    server::run_server,
};
use dotenvy::dotenv;
use log::info;

#[actix_web::main]
async fn main() {
    dotenv().ok();
    env_logger::init();
    if handle_command_line_args() == CliOutcome::Exit {
        return;
    }
    let config = ServerConfig::from_env_or_default();

    info!("🚀️ Starting bazaar server on {}:{}", config.host, config.port);
    match run_server(config).await {
        Ok(_) => println!("Bye!"),
        Err(e) => eprintln!("{e}"),
    }
}
