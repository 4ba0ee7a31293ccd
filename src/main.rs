use clap::Parser;
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use teloxide::Bot;
use tracing::info;
use tracing_subscriber::EnvFilter;
use upsc_mentor::application::question_store::QuestionStore;
use upsc_mentor::application::replies::PaymentDetails;
use upsc_mentor::application::router::{ConversationRouter, RouterSettings};
use upsc_mentor::domain::message::UserId;
use upsc_mentor::domain::ports::{ChatTransportRef, ExplainerBox, UsageLedgerBox};
use upsc_mentor::infrastructure::in_memory::InMemoryUsageLedger;
use upsc_mentor::infrastructure::openai::{
    DEFAULT_BASE_URL, DEFAULT_MODEL, OpenAiConfig, OpenAiExplainer,
};
use upsc_mentor::infrastructure::telegram::{TelegramTransport, run_polling};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Telegram bot token
    #[arg(
        long,
        env = "TELEGRAM_TOKEN",
        hide_env_values = true,
        required_unless_present = "check_dataset"
    )]
    telegram_token: Option<String>,

    /// OpenAI API key
    #[arg(
        long,
        env = "OPENAI_API_KEY",
        hide_env_values = true,
        required_unless_present = "check_dataset"
    )]
    openai_api_key: Option<String>,

    /// Tagged question dataset (CSV with Subject, Year and Question Text columns)
    #[arg(long, env = "DATASET_PATH", default_value = "UPSC_Master_Tagged.csv")]
    dataset: PathBuf,

    /// Completion model used for explanations
    #[arg(long, env = "OPENAI_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    openai_base_url: String,

    /// Free questions per user before the payment prompt
    #[arg(long, env = "FREE_LIMIT", default_value_t = upsc_mentor::domain::usage::FREE_LIMIT)]
    free_limit: u32,

    /// Upper bound for one explanation request, in seconds
    #[arg(long, env = "EXPLAIN_TIMEOUT_SECS", default_value_t = 60)]
    explain_timeout_secs: u64,

    /// UPI payee id shown in the payment prompt
    #[arg(long, env = "PAYMENT_ID", default_value = "upscmentor@upi")]
    payment_id: String,

    /// Price of unlimited access, in rupees
    #[arg(long, env = "PAYMENT_AMOUNT", default_value = "49")]
    payment_amount: Decimal,

    /// User ids allowed to run /grant and /revoke
    #[arg(long, env = "ADMIN_IDS", value_delimiter = ',')]
    admin_ids: Vec<u64>,

    /// Validate the dataset, print question counts per subject and exit
    #[arg(long)]
    check_dataset: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; real deployments set the environment directly.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let questions = QuestionStore::from_csv(&cli.dataset).into_diagnostic()?;
    info!(
        path = %cli.dataset.display(),
        questions = questions.len(),
        "dataset loaded"
    );

    if cli.check_dataset {
        for (subject, count) in questions.subject_counts() {
            println!("{subject},{count}");
        }
        return Ok(());
    }

    let (Some(telegram_token), Some(openai_api_key)) = (cli.telegram_token, cli.openai_api_key)
    else {
        miette::bail!("TELEGRAM_TOKEN and OPENAI_API_KEY are required to run the bot");
    };

    let timeout = Duration::from_secs(cli.explain_timeout_secs);
    let explainer = OpenAiExplainer::new(OpenAiConfig {
        api_key: openai_api_key,
        model: cli.model,
        base_url: cli.openai_base_url,
        timeout,
    })
    .into_diagnostic()?;

    let bot = Bot::new(telegram_token);
    let ledger: UsageLedgerBox = Box::new(InMemoryUsageLedger::with_limit(cli.free_limit));
    let explainer: ExplainerBox = Box::new(explainer);
    let transport: ChatTransportRef = Arc::new(TelegramTransport::new(bot.clone()));

    let router = ConversationRouter::new(
        Arc::new(questions),
        ledger,
        explainer,
        transport,
        RouterSettings {
            explain_timeout: timeout,
            payment: PaymentDetails {
                payee_id: cli.payment_id,
                amount: cli.payment_amount,
            },
            admins: cli.admin_ids.into_iter().map(UserId).collect(),
        },
    );

    info!(free_limit = cli.free_limit, "polling for updates");
    run_polling(bot, Arc::new(router)).await;
    Ok(())
}
