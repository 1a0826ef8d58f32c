use anyhow::Result;
use clap::{Parser, Subcommand};
use client_core::{CatalogClient, RemoteStore};
use shared::{domain::BookId, protocol::BookDraft};

#[derive(Parser, Debug)]
struct Cli {
    /// Base URL of the catalog server.
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    server_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every book in the catalog.
    List,
    /// Show a single book.
    Show { book_id: i64 },
    /// Add a new book.
    Add {
        title: String,
        author: String,
        description: String,
    },
    /// Replace every field of an existing book.
    Update {
        book_id: i64,
        title: String,
        author: String,
        description: String,
    },
    /// Delete a book.
    Delete { book_id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("warn").init();

    let cli = Cli::parse();
    let client = CatalogClient::new(cli.server_url);

    match cli.command {
        Command::List => {
            let books = client.list_books().await?;
            if books.is_empty() {
                println!("no books in the catalog");
            }
            for book in books {
                println!("{:>4}  {} by {}", book.book_id.0, book.title, book.author);
            }
        }
        Command::Show { book_id } => {
            let book = client.get_book(BookId(book_id)).await?;
            println!("{} by {}", book.title, book.author);
            println!("{}", book.description);
        }
        Command::Add {
            title,
            author,
            description,
        } => {
            client
                .create_book(&BookDraft {
                    title,
                    author,
                    description,
                })
                .await?;
            println!("book created");
        }
        Command::Update {
            book_id,
            title,
            author,
            description,
        } => {
            client
                .update_book(
                    BookId(book_id),
                    &BookDraft {
                        title,
                        author,
                        description,
                    },
                )
                .await?;
            println!("updated book_id={book_id}");
        }
        Command::Delete { book_id } => {
            client.delete_book(BookId(book_id)).await?;
            println!("deleted book_id={book_id}");
        }
    }

    Ok(())
}
