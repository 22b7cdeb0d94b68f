use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use log::info;

use buildandchill::bots::{bot_address, bot_id, BotSwarm};
use buildandchill::conference::OfflineConference;
use buildandchill::config::SimConfig;
use buildandchill::identity::StaticNames;
use buildandchill::peer::LoopbackHub;
use buildandchill::{EngineBuilder, World};

#[derive(Parser, Debug)]
#[command(name = "buildandchill", version, about = "Walk around a 2D event space with other attendees")]
struct Args {
    /// JSON tuning file; missing keys keep their defaults.
    #[arg(long, env = "BUILDANDCHILL_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 1280)]
    width: u32,

    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Number of wandering mock peers.
    #[arg(long, default_value_t = 2)]
    bots: usize,

    /// Wallet address shown as your name in chat.
    #[arg(long, env = "BUILDANDCHILL_WALLET")]
    wallet: Option<String>,

    /// Peer id on the local hub.
    #[arg(long, default_value = "me")]
    name: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SimConfig::from_json_file(path)?,
        None => SimConfig::default(),
    };
    let world = World::default_layout();

    let mut names = StaticNames::new();
    for i in 1..=args.bots {
        names = names.with(&bot_address(i), &format!("{}.base.eth", bot_id(i)));
    }

    let hub = LoopbackHub::new();
    let local = hub.join(args.name.clone());
    let swarm = BotSwarm::spawn(&hub, args.bots, &world);
    info!("{} bots wandering; {} members on the hub", swarm.len(), hub.member_count());

    let mut builder = EngineBuilder::new()
        .with_title("Build & Chill")
        .with_size(args.width, args.height)
        .with_config(config)
        .with_world(world)
        .with_peer_channel(Box::new(local))
        .with_conference(Arc::new(OfflineConference::new()))
        .with_resolver(Arc::new(names));
    if let Some(wallet) = &args.wallet {
        builder = builder.with_wallet_address(wallet);
    }
    builder.run()?;

    swarm.stop();
    Ok(())
}
