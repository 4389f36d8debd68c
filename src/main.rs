use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use erc8004::{
    chains, truncate_address, AgentService, ChainSelector, Config, Erc8004Client, NewAgent,
};
use ethers::types::U256;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "erc8004", version, about = "ERC-8004 agent registry client")]
struct Cli {
    /// Chain name (e.g. bsc-testnet) or chain ID; overrides ERC8004_CHAIN
    #[arg(long, global = true)]
    chain: Option<String>,

    /// RPC endpoint; overrides ERC8004_RPC_URL
    #[arg(long, global = true)]
    rpc_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List supported chains
    Chains,
    /// Show connection status and registry details
    Info,
    /// Look up an agent by ID
    Get { agent_id: u64 },
    /// Register a new agent (needs ERC8004_PRIVATE_KEY)
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        /// Service endpoint as NAME=URL, repeatable
        #[arg(long = "service", value_parser = parse_service)]
        services: Vec<AgentService>,
        #[arg(long)]
        image: Option<String>,
    },
    /// Show an agent's reputation
    Score {
        agent_id: u64,
        #[arg(long)]
        domain: Option<String>,
    },
    /// Submit a 0-100 reputation score (needs ERC8004_PRIVATE_KEY)
    SubmitScore {
        agent_id: u64,
        domain: String,
        score: u64,
        #[arg(long)]
        evidence: Option<String>,
    },
    /// Check whether an agent holds a validation of the given type
    Validation {
        agent_id: u64,
        #[arg(long = "type", default_value = "identity")]
        validation_type: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let connect_client = || connect(cli.chain.as_deref(), cli.rpc_url.as_deref());

    match cli.command {
        Command::Chains => print_chains(),
        Command::Info => {
            let client = connect_client()?;
            let chain = client.chain();
            println!("Chain: {} ({})", chain.name, chain.chain_id);
            println!("Connected: {}", client.is_connected().await);
            println!("IdentityRegistry: {:#x}", chain.identity_registry);
            if let Some(caip10) = &chain.agent_registry_caip10 {
                println!("Agent registry: {}", caip10);
            }
            let identity = client.identity();
            println!("Version: {}", client.get_version().await?);
            println!("Token: {} ({})", identity.name().await?, identity.symbol().await?);
        }
        Command::Get { agent_id } => {
            let client = connect_client()?;
            let agent = client.get_agent(U256::from(agent_id)).await?;
            println!("Agent #{}", agent.agent_id);
            println!("Owner: {}", truncate_address(&format!("{:#x}", agent.owner), 4));
            match &agent.metadata {
                Some(metadata) => println!("{}", serde_json::to_string_pretty(metadata)?),
                None => println!(
                    "Metadata unavailable (URI: {})",
                    agent.agent_uri.as_deref().unwrap_or("<none>")
                ),
            }
        }
        Command::Register {
            name,
            description,
            services,
            image,
        } => {
            let client = connect_client()?;
            if client.transport().sender().is_none() {
                bail!("ERC8004_PRIVATE_KEY is required to register");
            }
            let mut agent = NewAgent::new(name, description);
            for service in services {
                agent = agent.service(service);
            }
            if let Some(image) = image {
                agent = agent.image(image);
            }

            let (metadata, entries) = agent.into_metadata()?;
            let registered = client.register_full(metadata, &entries).await?;

            println!("[OK] Agent #{} registered", registered.agent_id);
            println!("   Owner: {:#x}", registered.owner);
            println!("   View: {}", client.chain().tx_url(&registered.tx_hash));
        }
        Command::Score { agent_id, domain } => {
            let client = connect_client()?;
            let reputation = client.reputation().await?;
            let agent_id = U256::from(agent_id);
            let score = match &domain {
                Some(domain) => reputation.get_score(agent_id, domain).await?,
                None => reputation.get_aggregate_score(agent_id).await?,
            };
            println!(
                "Agent #{} {}: {} ({} reviews)",
                agent_id,
                domain.as_deref().unwrap_or("aggregate"),
                score.score,
                score.count
            );
        }
        Command::SubmitScore {
            agent_id,
            domain,
            score,
            evidence,
        } => {
            let client = connect_client()?;
            let tx_hash = client
                .reputation()
                .await?
                .submit_score(U256::from(agent_id), &domain, score, evidence.as_deref())
                .await?;
            println!(
                "[OK] Score submitted: {}",
                client.chain().tx_url(&format!("{:#x}", tx_hash))
            );
        }
        Command::Validation {
            agent_id,
            validation_type,
        } => {
            let client = connect_client()?;
            let valid = client
                .validation()
                .await?
                .is_valid(U256::from(agent_id), &validation_type)
                .await?;
            println!("Agent #{} {} validation: {}", agent_id, validation_type, valid);
        }
    }

    Ok(())
}

/// Builds a client from the environment, with command-line overrides.
fn connect(chain: Option<&str>, rpc_url: Option<&str>) -> Result<Erc8004Client> {
    let mut config = Config::from_env()?;
    if let Some(chain) = chain {
        config.chain = chain.parse::<ChainSelector>()?;
    }
    if let Some(rpc_url) = rpc_url {
        config.rpc_url = Some(rpc_url.to_string());
    }
    Ok(Erc8004Client::from_config(&config)?)
}

fn print_chains() {
    for (key, chain) in chains::supported_chains() {
        println!(
            "{:<18} {:>9}  {:<18} reputation: {:<3} validation: {}",
            key,
            chain.chain_id,
            chain.name,
            if chain.reputation_registry.is_some() { "yes" } else { "no" },
            if chain.validation_registry.is_some() { "yes" } else { "no" },
        );
    }
}

fn parse_service(s: &str) -> Result<AgentService, String> {
    let (name, endpoint) = s
        .split_once('=')
        .ok_or_else(|| format!("Expected NAME=URL, got {}", s))?;
    Ok(AgentService::new(name.trim(), endpoint.trim()))
}
