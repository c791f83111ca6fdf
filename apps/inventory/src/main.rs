use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    process::ExitCode,
    sync::Arc,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{LaptopClient, LaptopService};
use shared::{domain::LaptopId, draft::DraftField};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use inventory::{
    config::{load_settings, Overrides},
    controller::{DetailController, FormController, ListController, Outcome},
    render,
    router::Route,
};

#[derive(Parser, Debug)]
#[command(name = "inventory", about = "Manage the laptop inventory from the terminal")]
struct Cli {
    /// Config file to read instead of ./inventory.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Base address of the laptops API, e.g. http://localhost:8080/api.
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show every laptop as a table.
    List,
    /// Show one laptop.
    Show { id: LaptopId },
    /// Add a laptop.
    Create {
        #[command(flatten)]
        fields: FieldArgs,
        /// Start from canned test values.
        #[arg(long)]
        sample: bool,
    },
    /// Change an existing laptop; fields not given keep their current value.
    Edit {
        id: LaptopId,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete a laptop from the list.
    Delete {
        id: LaptopId,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Open the page mounted at a path such as /laptops/7.
    Open { route: String },
}

#[derive(Args, Debug, Default)]
struct FieldArgs {
    #[arg(long)]
    brand: Option<String>,
    #[arg(long)]
    model: Option<String>,
    #[arg(long)]
    price: Option<String>,
    #[arg(long)]
    processor: Option<String>,
    #[arg(long)]
    ram: Option<String>,
    #[arg(long)]
    storage: Option<String>,
    #[arg(long)]
    gpu: Option<String>,
    #[arg(long)]
    operating_system: Option<String>,
    #[arg(long)]
    screen_size: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    stock_quantity: Option<String>,
    #[arg(long)]
    available: Option<bool>,
}

impl FieldArgs {
    fn apply(self, form: &mut FormController) {
        let fields = [
            (DraftField::Brand, self.brand),
            (DraftField::Model, self.model),
            (DraftField::Price, self.price),
            (DraftField::Processor, self.processor),
            (DraftField::Ram, self.ram),
            (DraftField::Storage, self.storage),
            (DraftField::Gpu, self.gpu),
            (DraftField::OperatingSystem, self.operating_system),
            (DraftField::ScreenSize, self.screen_size),
            (DraftField::Description, self.description),
            (DraftField::StockQuantity, self.stock_quantity),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                form.set_field(field, value);
            }
        }
        if let Some(available) = self.available {
            form.set_available(available);
        }
    }
}

struct App {
    service: Arc<dyn LaptopService>,
    notice_ttl: Duration,
}

impl App {
    /// Mounts `route` read-only and prints it. Returns whether the page
    /// settled without an error.
    async fn show(&self, route: &Route) -> bool {
        debug!(%route, "mounting page");
        match route {
            Route::List => {
                let mut page = ListController::new(Arc::clone(&self.service), self.notice_ttl);
                page.load().await;
                print!("{}", render::render_list(&page));
                page.state().error().is_none()
            }
            Route::Detail(id) => {
                let mut page = DetailController::new(Arc::clone(&self.service));
                page.load(id.clone()).await;
                print!("{}", render::render_detail(&page));
                page.state().error().is_none()
            }
            Route::Create => {
                let page = FormController::new_create(Arc::clone(&self.service));
                print!("{}", render::render_form(&page));
                true
            }
            Route::Edit(id) => {
                let mut page = FormController::new_edit(Arc::clone(&self.service), id.clone());
                page.load().await;
                print!("{}", render::render_form(&page));
                page.state().error().is_none()
            }
        }
    }

    async fn follow(&self, outcome: Outcome) -> bool {
        match outcome.route() {
            Some(route) => self.show(route).await,
            None => true,
        }
    }

    async fn submit(&self, mut page: FormController, fields: FieldArgs) -> bool {
        if page.state().error().is_some() {
            print!("{}", render::render_form(&page));
            return false;
        }
        fields.apply(&mut page);

        let outcome = page.submit().await;
        if outcome.route().is_none() {
            print!("{}", render::render_form(&page));
            return page.state().error().is_none();
        }
        self.follow(outcome).await
    }

    async fn create(&self, fields: FieldArgs, sample: bool) -> bool {
        let mut page = FormController::new_create(Arc::clone(&self.service));
        if sample {
            page.fill_sample();
        }
        self.submit(page, fields).await
    }

    async fn edit(&self, id: LaptopId, fields: FieldArgs) -> bool {
        let mut page = FormController::new_edit(Arc::clone(&self.service), id);
        page.load().await;
        self.submit(page, fields).await
    }

    async fn delete(&self, id: LaptopId, assume_yes: bool) -> bool {
        let mut page = ListController::new(Arc::clone(&self.service), self.notice_ttl);
        page.load().await;
        if page.state().error().is_some() {
            print!("{}", render::render_list(&page));
            return false;
        }

        let outcome = page
            .delete(&id, |prompt| assume_yes || confirm_on_stdin(prompt))
            .await;
        if outcome == Outcome::Declined {
            info!(%id, "delete cancelled");
        }
        print!("{}", render::render_list(&page));
        page.state().error().is_none()
    }
}

fn confirm_on_stdin(prompt: &str) -> bool {
    eprint!("{prompt} [y/N] ");
    if io::stderr().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let settings = load_settings(&Overrides {
        config_path: cli.config.clone(),
        api_base_url: cli.api_url.clone(),
    })
    .context("failed to load settings")?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let client = LaptopClient::new(&settings.api_base_url)
        .with_context(|| format!("failed to set up client for {}", settings.api_base_url))?;
    info!(base_url = %client.base_url(), "laptops api");

    let app = App {
        service: Arc::new(client),
        notice_ttl: Duration::from_secs(settings.notice_ttl_secs),
    };

    let ok = match cli.command {
        Command::List => app.show(&Route::List).await,
        Command::Show { id } => app.show(&Route::Detail(id)).await,
        Command::Create { fields, sample } => app.create(fields, sample).await,
        Command::Edit { id, fields } => app.edit(id, fields).await,
        Command::Delete { id, yes } => app.delete(id, yes).await,
        Command::Open { route } => {
            let route = Route::parse(&route)?;
            app.show(&route).await
        }
    };

    Ok(if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
