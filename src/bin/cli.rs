//! PJLink CLI Client
//!
//! Command-line interface for controlling a projector.

use clap::{Parser, Subcommand, ValueEnum};
use pjlink::projector::{Input, InputKind, MuteTarget, VolumeStep};
use pjlink::protocol::QUERY_MARKER;
use pjlink::{Argument, CommandCode, CommandSpec, Config, Outcome, PjlinkError, Projector, Session};
use pjlink::{TransportErrorPolicy, DEFAULT_PORT};
use tracing_subscriber::{fmt, EnvFilter};

/// PJLink CLI
#[derive(Parser, Debug)]
#[command(name = "pjlink-cli")]
#[command(about = "Control PJLink projectors over TCP")]
#[command(version)]
struct Args {
    /// Projector host name or IP address
    #[arg(short = 'H', long)]
    host: String,

    /// Projector TCP port
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// PJLink password
    #[arg(short = 'P', long)]
    password: Option<String>,

    /// Per-attempt response timeout in milliseconds
    #[arg(long, default_value = "2000")]
    timeout_ms: u64,

    /// Retries after the first attempt
    #[arg(long, default_value = "5")]
    retries: u32,

    /// Fail an attempt as soon as the socket reports an error
    #[arg(long)]
    fail_fast: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Power on, off, or show status
    Power {
        #[arg(value_enum)]
        action: Switch,
    },

    /// Select an input, or show the current one when no kind is given
    Input {
        #[arg(value_enum)]
        kind: Option<Kind>,

        /// Input number within the kind (1-9)
        #[arg(default_value = "1")]
        number: u8,
    },

    /// List available inputs
    Inputs,

    /// Mute video, audio, or both
    Mute {
        #[arg(value_enum)]
        target: Target,

        #[arg(value_enum)]
        action: Switch,
    },

    /// Freeze the picture
    Freeze {
        #[arg(value_enum)]
        action: Switch,
    },

    /// Step speaker volume
    Volume {
        #[arg(value_enum)]
        step: Step,
    },

    /// Show lamp hours
    Lamps,

    /// Show error status
    Errors,

    /// Show the probed identity
    Info,

    /// Send a raw command, e.g. `raw POWR ?`
    Raw {
        /// 4-character command code
        command: String,

        /// Decimal value, or `?` to query
        argument: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Switch {
    On,
    Off,
    Status,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Kind {
    Rgb,
    Video,
    Digital,
    Storage,
    Network,
    Internal,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Target {
    Video,
    Audio,
    All,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Step {
    Up,
    Down,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing/logging
    let default_filter = if args.verbose { "info,pjlink=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt().with_env_filter(filter).with_target(true).init();

    tracing::debug!("pjlink-cli v{}", pjlink::VERSION);

    let mut builder = Config::builder()
        .host(&args.host)
        .port(args.port)
        .response_timeout_ms(args.timeout_ms)
        .max_retries(args.retries);
    if let Some(password) = &args.password {
        builder = builder.password(password);
    }
    if args.fail_fast {
        builder = builder.transport_errors(TransportErrorPolicy::FailAttempt);
    }
    let session = Session::new(builder.build());

    if let Err(e) = run(session, args.command).await {
        tracing::error!("Command failed: {}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

async fn run(session: Session, command: Commands) -> pjlink::Result<()> {
    // Raw commands skip the identity probe
    if let Commands::Raw { command, argument } = &command {
        return raw(&session, command, argument).await;
    }

    let projector = Projector::open(session).await;
    run_projector(&projector, command).await
}

async fn raw(session: &Session, command: &str, argument: &str) -> pjlink::Result<()> {
    let code = CommandCode::parse(command)?;
    let argument = if argument == QUERY_MARKER {
        Argument::Query
    } else {
        let value = argument.parse::<u32>().map_err(|_| {
            PjlinkError::InvalidCommand(format!(
                "argument {:?} is neither ? nor a decimal value",
                argument
            ))
        })?;
        Argument::Set(value)
    };

    match session.perform_command(CommandSpec::new(code, argument)).await? {
        Outcome::Ack => println!("OK"),
        Outcome::Payload(payload) => println!("{}", payload),
    }
    Ok(())
}

async fn run_projector(projector: &Projector, command: Commands) -> pjlink::Result<()> {
    match command {
        Commands::Power { action } => match action {
            Switch::On => projector.power_on().await?,
            Switch::Off => projector.power_off().await?,
            Switch::Status => println!("{:?}", projector.power_state().await?),
        },
        Commands::Input { kind: None, .. } => println!("{}", projector.input().await?),
        Commands::Input {
            kind: Some(kind),
            number,
        } => {
            let kind = match kind {
                Kind::Rgb => InputKind::Rgb,
                Kind::Video => InputKind::Video,
                Kind::Digital => InputKind::Digital,
                Kind::Storage => InputKind::Storage,
                Kind::Network => InputKind::Network,
                Kind::Internal => InputKind::Internal,
            };
            projector.set_input(Input::new(kind, number)?).await?;
        }
        Commands::Inputs => {
            for input in projector.inputs().await? {
                println!("{} ({})", input, input.code());
            }
        }
        Commands::Mute { target, action } => {
            let target = match target {
                Target::Video => MuteTarget::Video,
                Target::Audio => MuteTarget::Audio,
                Target::All => MuteTarget::AudioVideo,
            };
            match action {
                Switch::On => projector.set_mute(target, true).await?,
                Switch::Off => projector.set_mute(target, false).await?,
                Switch::Status => println!("{:?}", projector.mute_state().await?),
            }
        }
        Commands::Freeze { action } => match action {
            Switch::On => projector.set_freeze(true).await?,
            Switch::Off => projector.set_freeze(false).await?,
            Switch::Status => println!("{}", projector.freeze_state().await?),
        },
        Commands::Volume { step } => {
            let step = match step {
                Step::Up => VolumeStep::Up,
                Step::Down => VolumeStep::Down,
            };
            projector.speaker_volume(step).await?;
        }
        Commands::Lamps => {
            for (i, lamp) in projector.lamps().await?.iter().enumerate() {
                println!(
                    "lamp {}: {} hours, {}",
                    i + 1,
                    lamp.hours,
                    if lamp.lit { "on" } else { "off" }
                );
            }
        }
        Commands::Errors => println!("{:?}", projector.error_status().await?),
        Commands::Info => match projector.identity() {
            Some(identity) => {
                println!("name:         {}", identity.name);
                println!("manufacturer: {}", identity.manufacturer);
                println!("product:      {}", identity.product);
                println!("info:         {}", identity.info);
                println!("class:        {}", identity.class);
            }
            None => println!("identity unavailable"),
        },
        Commands::Raw { command, argument } => {
            raw(projector.session(), &command, &argument).await?
        }
    }
    Ok(())
}
