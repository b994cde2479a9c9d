use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{anyhow, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;
use supabase_client::{SupabaseClient, SupabaseClientTrait};
use task_core::{Config, Identity, Task};
use task_sync::{spawn_session_listener, FileSessionStore, SessionManager, TaskListSynchronizer};

#[derive(Parser)]
#[command(name = "task-cli")]
#[command(about = "Task manager backed by a hosted Supabase project")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, short, default_value = "false")]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new account
    Signup {
        email: String,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Sign in and persist the session locally
    Login {
        email: String,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Sign out and clear the persisted session
    Logout,
    /// Show the signed-in identity
    Whoami,
    /// List tasks, most recently created first
    List,
    /// Add a task
    Add {
        title: String,
    },
    /// Toggle a task's completed flag
    Toggle {
        id: i64,
    },
    /// Delete a task
    Rm {
        id: i64,
    },
    /// Interactive mode
    Shell,
}

struct Shell {
    session: Arc<SessionManager>,
    sync: Arc<TaskListSynchronizer>,
    identity: Option<Identity>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let default_filter = if cli.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = Config::new();
    let client: Arc<dyn SupabaseClientTrait> = Arc::new(SupabaseClient::new(&config));
    let store = Arc::new(FileSessionStore::new(task_core::paths::app_data_dir()));
    let session = Arc::new(SessionManager::new(Arc::clone(&client), store));
    let sync = Arc::new(TaskListSynchronizer::new(Arc::clone(&client)));
    let _listener = spawn_session_listener(
        Arc::clone(&client),
        Arc::clone(&session),
        Arc::clone(&sync),
    );

    // Resolve the persisted session before doing anything visible.
    let restored = session.restore_session().await;
    if let Some(identity) = &restored {
        sync.set_active_owner(Some(identity.id.clone())).await;
    }

    let mut shell = Shell {
        session,
        sync,
        identity: restored,
    };

    match cli.command {
        Commands::Signup { email, password } => shell.signup(&email, password).await,
        Commands::Login { email, password } => shell.login(&email, password).await,
        Commands::Logout => shell.logout().await,
        Commands::Whoami => shell.whoami(),
        Commands::List => shell.list().await,
        Commands::Add { title } => shell.add(&title).await,
        Commands::Toggle { id } => shell.toggle(id).await,
        Commands::Rm { id } => shell.rm(id).await,
        Commands::Shell => shell.interactive().await,
    }
}

impl Shell {
    fn require_identity(&self) -> anyhow::Result<&Identity> {
        self.identity
            .as_ref()
            .ok_or_else(|| anyhow!("not signed in; run `task-cli login <email>` first"))
    }

    async fn signup(&self, email: &str, password: Option<String>) -> anyhow::Result<()> {
        let password = read_password(password)?;
        let identity = self.session.sign_up(email, &password).await?;
        println!(
            "{} account created for {} (confirmation may be required before login)",
            "✓".green(),
            identity.email.as_deref().unwrap_or(email)
        );
        Ok(())
    }

    async fn login(&mut self, email: &str, password: Option<String>) -> anyhow::Result<()> {
        let password = read_password(password)?;
        let identity = self.session.sign_in(email, &password).await?;
        println!("{} signed in as {}", "✓".green(), identity.id);

        // The session listener fetches too; doing it here as well makes the
        // first listing immediate for one-shot runs.
        self.sync.set_active_owner(Some(identity.id.clone())).await;
        self.sync.fetch_all(&identity.id).await?;
        self.identity = Some(identity);
        print_tasks(&self.sync.snapshot().await);
        Ok(())
    }

    async fn logout(&mut self) -> anyhow::Result<()> {
        if self.identity.is_none() {
            println!("not signed in");
            return Ok(());
        }
        self.session.sign_out().await?;
        self.identity = None;
        println!("{} signed out", "✓".green());
        Ok(())
    }

    fn whoami(&self) -> anyhow::Result<()> {
        match &self.identity {
            Some(identity) => {
                println!(
                    "{} ({})",
                    identity.id,
                    identity.email.as_deref().unwrap_or("email unknown")
                );
            }
            None => println!("not signed in"),
        }
        Ok(())
    }

    async fn list(&self) -> anyhow::Result<()> {
        let identity = self.require_identity()?;
        self.sync.fetch_all(&identity.id).await?;
        print_tasks(&self.sync.snapshot().await);
        Ok(())
    }

    async fn add(&self, title: &str) -> anyhow::Result<()> {
        let identity = self.require_identity()?;
        self.sync.fetch_all(&identity.id).await?;
        if !self.sync.add(title, &identity.id).await? {
            bail!("task title must not be empty");
        }
        print_tasks(&self.sync.snapshot().await);
        Ok(())
    }

    async fn toggle(&self, id: i64) -> anyhow::Result<()> {
        let identity = self.require_identity()?;
        self.sync.fetch_all(&identity.id).await?;
        if !self.sync.toggle_complete(id).await? {
            bail!("no task with id {id}");
        }
        print_tasks(&self.sync.snapshot().await);
        Ok(())
    }

    async fn rm(&self, id: i64) -> anyhow::Result<()> {
        let identity = self.require_identity()?;
        self.sync.fetch_all(&identity.id).await?;
        self.sync.remove(id).await?;
        print_tasks(&self.sync.snapshot().await);
        Ok(())
    }

    async fn interactive(&mut self) -> anyhow::Result<()> {
        println!("task manager - type 'help' for commands, 'quit' to leave");
        if let Some(identity) = &self.identity {
            println!("signed in as {}", identity.id.as_str().bold());
        } else {
            println!("not signed in; use: login <email>");
        }

        loop {
            print!("{} ", ">".cyan());
            io::stdout().flush()?;
            let mut line = String::new();
            if io::stdin().read_line(&mut line)? == 0 {
                break;
            }
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (command, rest) = match line.split_once(char::is_whitespace) {
                Some((command, rest)) => (command, rest.trim()),
                None => (line, ""),
            };

            let result = match command {
                "help" => {
                    print_help();
                    Ok(())
                }
                "quit" | "exit" => break,
                "login" if !rest.is_empty() => self.login(rest, None).await,
                "login" => Err(anyhow!("usage: login <email>")),
                "signup" if !rest.is_empty() => self.signup(rest, None).await,
                "signup" => Err(anyhow!("usage: signup <email>")),
                "logout" => self.logout().await,
                "whoami" => self.whoami(),
                "list" | "ls" => self.list().await,
                "add" if !rest.is_empty() => self.add(rest).await,
                "add" => Err(anyhow!("usage: add <title>")),
                "toggle" | "done" => match rest.parse::<i64>() {
                    Ok(id) => self.toggle(id).await,
                    Err(_) => Err(anyhow!("usage: {command} <id>")),
                },
                "rm" => match rest.parse::<i64>() {
                    Ok(id) => self.rm(id).await,
                    Err(_) => Err(anyhow!("usage: rm <id>")),
                },
                other => Err(anyhow!("unknown command '{other}', try 'help'")),
            };

            if let Err(err) = result {
                eprintln!("{} {err}", "error:".red());
            }
        }
        Ok(())
    }
}

fn read_password(provided: Option<String>) -> anyhow::Result<String> {
    match provided {
        Some(password) => Ok(password),
        None => Ok(rpassword::prompt_password("Password: ")?),
    }
}

fn print_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("no tasks");
        return;
    }
    for task in tasks {
        let marker = if task.completed {
            "[x]".green()
        } else {
            "[ ]".normal()
        };
        let title = if task.completed {
            task.title.as_str().dimmed()
        } else {
            task.title.as_str().normal()
        };
        println!("{:>6}  {marker} {title}", task.id);
    }
}

fn print_help() {
    println!("  signup <email>   create an account");
    println!("  login <email>    sign in");
    println!("  logout           sign out");
    println!("  whoami           show the signed-in identity");
    println!("  list             list tasks, newest first");
    println!("  add <title>      add a task");
    println!("  toggle <id>      flip a task's completed flag");
    println!("  rm <id>          delete a task");
    println!("  quit             leave");
}
