use clap::{Parser, Subcommand};
use flux_client::{FluxClient, NewInvoice};

const TOKEN_FILE: &str = ".flux_token";

#[derive(Parser, Debug)]
#[command(about = "FluxFinance command-line client")]
struct Cli {
    /// Server base URL.
    #[clap(short, long, default_value = "http://127.0.0.1:3000")]
    server: String,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and persist the issued token for later commands.
    SignIn {
        #[clap(long)]
        email: String,
        #[clap(long)]
        password: String,
    },
    /// List all invoices, newest first.
    ListInvoices,
    /// Create an invoice; the server computes the sum.
    CreateInvoice {
        #[clap(long)]
        date: String,
        #[clap(long)]
        description: String,
        #[clap(long)]
        quantity: i64,
        #[clap(long)]
        payment_method: String,
        #[clap(long)]
        currency: String,
        #[clap(long)]
        invoice_number: String,
        #[clap(long)]
        vat_percentage: f64,
        #[clap(long)]
        price: f64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let mut client = FluxClient::new(&args.server)?;
    if let Ok(token) = std::fs::read_to_string(TOKEN_FILE) {
        client = client.with_token(token.trim().to_string());
    }

    match args.command {
        Command::SignIn { email, password } => {
            let signed_in = client.sign_in(&email, &password).await?;
            std::fs::write(TOKEN_FILE, &signed_in.token)?;
            println!("Signed in as {}", signed_in.user_id);
        }
        Command::ListInvoices => {
            let invoices = client.list_invoices().await?;
            println!("Invoices ({})", invoices.len());
            for invoice in invoices {
                println!(
                    "- [{}] {} {} {:.2} ({})",
                    invoice.invoice_number,
                    invoice.date,
                    invoice.currency,
                    invoice.sum,
                    invoice.description
                );
            }
        }
        Command::CreateInvoice {
            date,
            description,
            quantity,
            payment_method,
            currency,
            invoice_number,
            vat_percentage,
            price,
        } => {
            let invoice = client
                .create_invoice(&NewInvoice {
                    date,
                    description,
                    quantity,
                    payment_method,
                    currency,
                    invoice_number,
                    vat_percentage,
                    price,
                })
                .await?;
            println!(
                "Created invoice {} with sum {} {:.2}",
                invoice.invoice_number, invoice.currency, invoice.sum
            );
        }
    }

    Ok(())
}
