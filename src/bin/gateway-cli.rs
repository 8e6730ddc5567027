use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Management CLI for the invoice payment gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Admin API key (Bearer token).
    #[arg(short, long, default_value = "CHANGE_ME_IN_PRODUCTION")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check gateway status
    Status,
    /// List configured settings (values masked)
    Settings,
    /// Store a provider secret
    SetKey { name: String, value: String },
    /// Create a payment link for an invoice
    CreateLink {
        /// Amount in the smallest currency unit (paise)
        amount: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        invoice: String,
    },
    /// Look up an order's payment state
    OrderStatus { order_id: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", cli.key))?,
    );

    match cli.command {
        Commands::Status => {
            let res = client
                .get(format!("{}/admin/status", cli.url))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Settings => {
            let res = client
                .get(format!("{}/admin/settings", cli.url))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::SetKey { name, value } => {
            let res = client
                .put(format!("{}/admin/settings", cli.url))
                .headers(headers)
                .json(&serde_json::json!({ "name": name, "value": value }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::CreateLink {
            amount,
            name,
            phone,
            invoice,
        } => {
            let res = client
                .post(format!("{}/api/links", cli.url))
                .json(&serde_json::json!({
                    "amount": amount,
                    "customerName": name,
                    "phone": phone,
                    "invoiceNumber": invoice,
                }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::OrderStatus { order_id } => {
            let res = client
                .get(format!("{}/api/orders/{}/status", cli.url, order_id))
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
