use {
    std::path::PathBuf,
    anyhow::Result,
    itertools::Itertools as _,
    tracing_subscriber::{
        EnvFilter,
        fmt,
    },
    crate::{
        account::RegistrationForm,
        admin::PendingAccounts,
        api::HttpBackend,
        config::Config,
        details::{
            PanelUpdate,
            Panels,
            Removal,
        },
        id::{
            Contestants,
            Contests,
            Id,
            Users,
        },
        lang::Toast,
    },
};

mod account;
mod admin;
mod api;
mod config;
mod contestant;
mod details;
mod enter;
mod id;
mod lang;
#[cfg(test)] mod test_util;
mod util;

mod prelude {
    pub(crate) use {
        std::{
            collections::BTreeSet,
            fmt,
            marker::PhantomData,
            str::FromStr,
            time::Duration,
        },
        async_trait::async_trait,
        itertools::Itertools as _,
        rocket::response::content::RawHtml,
        rocket_util::{
            ToHtml,
            html,
        },
        serde::{
            Deserialize,
            Serialize,
            de::DeserializeOwned,
        },
        url::Url,
    };
}

#[derive(clap::Subcommand)]
enum Subcommand {
    /// Approve pending account requests
    Approve {
        users: Vec<Id<Users>>,
    },
    /// Reject pending account requests
    Reject {
        users: Vec<Id<Users>>,
    },
    /// Show the details of a contest
    Contest {
        pk: Id<Contests>,
    },
    /// Show the details of an account
    User {
        id: Id<Users>,
    },
    /// Show the details of an entered contestant
    Contestant {
        id: Id<Contestants>,
    },
    /// Delete an entered contestant
    RemoveContestant {
        id: Id<Contestants>,
    },
    /// Enter contestants for a contest
    Enter {
        contest: Id<Contests>,
        /// CSV file with one contestant per row, headed by field names
        #[clap(long)]
        import: Option<PathBuf>,
        /// The contest takes a single contestant
        #[clap(long)]
        individual: bool,
    },
    /// Request an account
    Register(RegistrationForm),
}

#[derive(clap::Parser)]
#[clap(version)]
struct Args {
    #[clap(subcommand)]
    subcommand: Subcommand,
}

fn print_toast(toast: Toast) {
    eprintln!("{toast}");
    log::debug!("toast shown for {} ms", toast.duration.as_millis());
}

fn print_panel(update: PanelUpdate) {
    match update {
        PanelUpdate::Shown(html) => println!("{}", html.0),
        PanelUpdate::Hidden => {}
        PanelUpdate::Failed(toast) => print_toast(toast),
    }
}

async fn manage_users(backend: &HttpBackend, users: Vec<Id<Users>>, create: bool) {
    let mut accounts = users.iter().copied().collect::<PendingAccounts>();
    for user in users {
        let toast = admin::manage_user(backend, &mut accounts, user, create).await;
        println!("{user}: {toast}");
    }
    if !accounts.is_empty() {
        log::warn!("account requests still pending: {}", accounts.iter().join(", "));
    }
}

#[wheel::main]
async fn main(Args { subcommand }: Args) -> Result<()> {
    fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))).init();
    if rustls::crypto::ring::default_provider().install_default().is_err() {
        log::debug!("a rustls crypto provider was already installed");
    }
    let config = Config::load().await?;
    let backend = HttpBackend::new(&config)?;
    match subcommand {
        Subcommand::Approve { users } | Subcommand::Reject { users } if users.is_empty() => log::warn!("no account requests given"),
        Subcommand::Approve { users } => manage_users(&backend, users, true).await,
        Subcommand::Reject { users } => manage_users(&backend, users, false).await,
        Subcommand::Contest { pk } => print_panel(Panels::<Contests>::default().get_contest_info(&backend, pk).await),
        Subcommand::User { id } => print_panel(Panels::<Users>::default().get_user_info(&backend, id).await),
        Subcommand::Contestant { id } => print_panel(Panels::<Contestants>::default().get_contestant_info(&backend, id).await),
        Subcommand::RemoveContestant { id } => match details::remove_contestant(&backend, id).await {
            Removal::Reload => println!("usunięto zawodnika {id}"),
            Removal::Failed(toast) => print_toast(toast),
        },
        Subcommand::Enter { contest, import, individual } => enter::run(&backend, contest, import.as_deref(), individual).await?,
        Subcommand::Register(form) => match account::register(&backend, &form).await {
            Ok(Ok(())) => println!("wysłano prośbę o założenie konta"),
            Ok(Err(toast)) => print_toast(toast),
            Err(states) => {
                println!("{}", form.render(&states).0);
                for (field, state) in states {
                    if let Some(error) = state.error() {
                        eprintln!("{field:?}: {error}");
                    }
                }
            }
        },
    }
    Ok(())
}
