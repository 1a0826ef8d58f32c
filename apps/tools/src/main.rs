use anyhow::Result;
use clap::{Parser, Subcommand};
use shared::{domain::BookId, protocol::BookDraft};
use storage::Storage;

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "sqlite://./data/catalog.db")]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    AddBook {
        title: String,
        author: String,
        description: String,
    },
    ListBooks,
    DeleteBook {
        book_id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let storage = Storage::new(&cli.database_url).await?;

    match cli.command {
        Command::AddBook {
            title,
            author,
            description,
        } => {
            let book_id = storage
                .insert_book(&BookDraft {
                    title,
                    author,
                    description,
                })
                .await?;
            println!("created book_id={}", book_id.0);
        }
        Command::ListBooks => {
            for book in storage.list_books().await? {
                println!("{:>4}  {} by {}", book.book_id.0, book.title, book.author);
            }
        }
        Command::DeleteBook { book_id } => {
            if storage.delete_book(BookId(book_id)).await? {
                println!("deleted book_id={book_id}");
            } else {
                println!("no book with book_id={book_id}");
            }
        }
    }

    Ok(())
}
