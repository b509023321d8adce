//! Command-line arguments

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use maintrack_domain::{Priority, RequestId, RequestOrdering, RequestStatus};

/// Maintenance request tracking client
#[derive(Parser, Debug)]
#[command(name = "maintrack", version, about = "Maintenance request tracking client")]
pub struct Cli {
    /// Config file (JSON or TOML); the standard locations are probed when
    /// omitted.
    #[arg(long, global = true, env = "MAINTRACK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print JSON instead of a table.
    #[arg(long, global = true)]
    pub json: bool,

    /// More log output on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and store the issued credentials.
    Login {
        #[arg(short, long)]
        username: String,
        /// Read from stdin when not given.
        #[arg(long, env = "MAINTRACK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Forget the stored credentials.
    Logout,
    /// Show whether credentials are stored and where requests go.
    Status,
    /// List maintenance requests.
    List(ListArgs),
    /// Show one request with its status history.
    Show { id: RequestId },
    /// Open a new request.
    Create(CreateArgs),
    /// Change title, description, priority or location.
    Update(UpdateArgs),
    /// Move a request to another status.
    SetStatus {
        id: RequestId,
        /// pendente, em_andamento, concluido or cancelado
        status: RequestStatus,
        #[arg(long)]
        note: Option<String>,
    },
    /// Delete a request.
    Delete { id: RequestId },
    /// Requests opened by the logged-in user.
    Mine,
    /// Requests waiting for approval.
    Pending,
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    #[arg(long)]
    pub status: Option<RequestStatus>,
    #[arg(long)]
    pub priority: Option<Priority>,
    /// Free-text search over title, description and location.
    #[arg(long)]
    pub search: Option<String>,
    /// Only requests opened by this user id.
    #[arg(long)]
    pub requester: Option<u64>,
    /// -criado_em, criado_em, prioridade or -prioridade
    #[arg(long, allow_hyphen_values = true)]
    pub ordering: Option<RequestOrdering>,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub description: String,
    /// baixa, media or alta
    #[arg(long, default_value = "media")]
    pub priority: Priority,
    #[arg(long)]
    pub location: Option<String>,
    /// File uploaded with the request.
    #[arg(long)]
    pub attachment: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    pub id: RequestId,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub priority: Option<Priority>,
    #[arg(long)]
    pub location: Option<String>,
}
