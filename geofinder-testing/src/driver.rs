use clap::{Parser, Subcommand, ValueEnum};
use geofinder_logic::LocationFix;
use geofinder_test_shared::*;
use interprocess::local_socket::{tokio::Stream, traits::tokio::Stream as _};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[derive(Parser)]
struct Cli {
    /// Name of the local socket the test daemon is listening on
    socket: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum ErrorCodeValue {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    Unknown,
}

impl ErrorCodeValue {
    fn as_code(self) -> &'static str {
        match self {
            Self::PermissionDenied => "permission-denied",
            Self::PositionUnavailable => "position-unavailable",
            Self::Timeout => "timeout",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Press the locate button
    Request,
    /// Answer the oldest pending query with a fix
    Succeed {
        latitude: f64,
        longitude: f64,
        /// Accuracy radius in meters
        #[arg(default_value_t = 10.0)]
        accuracy: f64,
    },
    /// Answer the oldest pending query with an error
    Fail {
        #[arg(value_enum)]
        code: ErrorCodeValue,
    },
    /// Make the platform report location as (un)supported
    Supported {
        #[arg(action = clap::ArgAction::Set)]
        supported: bool,
    },
    /// Print the current location state
    State,
}

impl From<Commands> for TestingRequest {
    fn from(val: Commands) -> Self {
        match val {
            Commands::Request => TestingRequest::RequestLocation,
            Commands::Succeed {
                latitude,
                longitude,
                accuracy,
            } => TestingRequest::Resolve(ScriptedAnswer::Fix(LocationFix {
                latitude,
                longitude,
                accuracy,
            })),
            Commands::Fail { code } => {
                TestingRequest::Resolve(ScriptedAnswer::Error(code.as_code().to_string()))
            }
            Commands::Supported { supported } => TestingRequest::SetSupported(supported),
            Commands::State => TestingRequest::GetState,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result {
    let cli = Cli::parse();

    let socket_name = get_socket_name(cli.socket.clone()).context("Failed to get socket name")?;

    let stream = Stream::connect(socket_name)
        .await
        .context("Failed to connect to socket")?;

    let req = TestingRequest::from(cli.command);
    let mut encoded = serde_json::to_vec(&req).context("Failed to encode request")?;
    encoded.push(b'\n');
    (&stream)
        .write_all(&encoded)
        .await
        .context("Failed to send request")?;

    let mut recv = BufReader::new(&stream);
    let mut line = String::with_capacity(256);

    // Print any pushed updates until the daemon answers us
    loop {
        line.clear();
        let read = recv
            .read_line(&mut line)
            .await
            .context("Failed to read response")?;
        if read == 0 {
            bail!("Daemon closed the connection without answering");
        }

        let resp = serde_json::from_str::<TestingResponse>(&line)
            .context("Failed to decode response")?;
        println!("{resp:?}");

        match resp {
            TestingResponse::Error(why) => bail!("Daemon error: {why}"),
            resp if resp.is_reply() => break,
            _ => {}
        }
    }

    Ok(())
}
