use anyhow::Result;
use clap::Parser;
use paper_harvest::core::catalog::scan_papers;
use paper_harvest::utils::logger;

#[derive(Parser)]
#[command(name = "paper_summary")]
#[command(about = "List the papers saved by paper-harvest")]
struct Args {
    /// Directory holding the paper text files
    #[arg(short, long, default_value = "papers_txt")]
    dir: String,

    /// Print the papers as JSON
    #[arg(long)]
    json: bool,

    /// Characters of the abstract to show per paper
    #[arg(long, default_value = "80")]
    preview_chars: usize,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose, false);

    let papers = scan_papers(&args.dir).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&papers)?);
        return Ok(());
    }

    println!("Found {} papers in {}\n", papers.len(), args.dir);
    for paper in &papers {
        let preview: String = paper.abstract_text.chars().take(args.preview_chars).collect();
        let ellipsis = if paper.abstract_text.chars().count() > args.preview_chars {
            "…"
        } else {
            ""
        };
        println!("• {}", paper.title);
        println!("  {}{}", preview, ellipsis);
        println!("  ({})", paper.file_name);
    }

    Ok(())
}
