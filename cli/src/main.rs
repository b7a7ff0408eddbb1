//! paper-outline CLI - outline extraction for academic paper PDFs

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use paper_outline::outline::{FontStatistics, HeadingDetector};
use paper_outline::{
    extract_outline_with_options, load_with_options, parse_arxiv_id, Error, JsonFormat, Outline,
    OutlineOptions, PageSelection, RenderOptions,
};

#[derive(Parser)]
#[command(name = "paper-outline")]
#[command(version)]
#[command(about = "Extract section outlines from academic paper PDFs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the outline of a paper
    Outline {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Paper title as reported by its repository
        #[arg(long, default_value = "")]
        title: String,

        /// Paper abstract as reported by its repository
        #[arg(long = "abstract", default_value = "")]
        abstract_text: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "markdown")]
        format: OutputFormat,

        /// Number sections in Markdown output
        #[arg(long)]
        numbered: bool,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// JSON options file
        #[arg(long, value_name = "FILE", env = "PAPER_OUTLINE_CONFIG")]
        config: Option<PathBuf>,

        /// Cap on hierarchy depth
        #[arg(long)]
        max_levels: Option<u8>,

        /// Minimum font-size ratio over body text for headings
        #[arg(long)]
        size_margin: Option<f32>,

        /// Longest heading text in characters
        #[arg(long)]
        max_heading_length: Option<usize>,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        /// Fail on undecodable page content
        #[arg(long)]
        strict: bool,
    },

    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Extract outlines of every PDF in a directory
    Batch {
        /// Directory containing PDF files
        #[arg(value_name = "DIR")]
        input: PathBuf,

        /// Output directory (defaults to the input directory)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Number sections in Markdown output
        #[arg(long)]
        numbered: bool,
    },

    /// Print the arXiv identifier contained in a URL
    ArxivId {
        /// arXiv URL or identifier
        #[arg(value_name = "URL")]
        input: String,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Indented plain text
    Text,
    /// Markdown headings
    Markdown,
    /// Pretty-printed JSON
    Json,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Outline {
            input,
            title,
            abstract_text,
            format,
            numbered,
            output,
            config,
            max_levels,
            size_margin,
            max_heading_length,
            pages,
            strict,
        } => build_options(
            config.as_deref(),
            max_levels,
            size_margin,
            max_heading_length,
            pages.as_deref(),
            strict,
        )
        .and_then(|options| {
            cmd_outline(
                &input,
                &title,
                &abstract_text,
                format,
                numbered,
                output.as_deref(),
                &options,
            )
        }),
        Commands::Info { input } => cmd_info(&input),
        Commands::Batch {
            input,
            output,
            numbered,
        } => cmd_batch(&input, output.as_deref(), numbered),
        Commands::ArxivId { input } => cmd_arxiv_id(&input),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn build_options(
    config: Option<&Path>,
    max_levels: Option<u8>,
    size_margin: Option<f32>,
    max_heading_length: Option<usize>,
    pages: Option<&str>,
    strict: bool,
) -> Result<OutlineOptions, Box<dyn std::error::Error>> {
    let mut options = match config {
        Some(path) => OutlineOptions::from_json(&fs::read_to_string(path)?)?,
        None => OutlineOptions::default(),
    };

    if let Some(levels) = max_levels {
        options = options.with_max_levels(levels);
    }
    if let Some(margin) = size_margin {
        options = options.with_size_margin(margin);
    }
    if let Some(length) = max_heading_length {
        options = options.with_max_heading_length(length);
    }
    if let Some(p) = pages {
        let selection = PageSelection::parse(p).map_err(|e| format!("Invalid page range: {}", e))?;
        options = options.with_pages(selection);
    }
    if strict {
        options = options.strict();
    }

    options.validate()?;
    Ok(options)
}

fn cmd_outline(
    input: &Path,
    title: &str,
    abstract_text: &str,
    format: OutputFormat,
    numbered: bool,
    output: Option<&Path>,
    options: &OutlineOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = fs::read(input)?;

    let outline = match extract_outline_with_options(&bytes, title, abstract_text, options) {
        Ok(outline) => outline,
        Err(Error::NoHeadingsFound) => {
            let (title, abstract_text) = paper_outline::normalize(title, abstract_text);
            if !title.is_empty() {
                println!("{}", title.bold());
            }
            if !abstract_text.is_empty() {
                println!("{}", abstract_text);
            }
            println!("{}", "No outline available".yellow());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let rendered = render(&outline, format, numbered)?;

    if let Some(path) = output {
        fs::write(path, &rendered)?;
        println!(
            "{} {} ({} headings)",
            "Saved to".green(),
            path.display(),
            outline.len()
        );
    } else {
        println!("{}", rendered);
    }

    Ok(())
}

fn render(
    outline: &Outline,
    format: OutputFormat,
    numbered: bool,
) -> Result<String, Box<dyn std::error::Error>> {
    let render_options = RenderOptions::new().with_numbering(numbered);
    let rendered = match format {
        OutputFormat::Text => paper_outline::render::to_text(outline, &render_options)?,
        OutputFormat::Markdown => paper_outline::render::to_markdown(outline, &render_options)?,
        OutputFormat::Json => paper_outline::render::to_json(outline, JsonFormat::Pretty)?,
    };
    Ok(rendered)
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = fs::read(input)?;
    let options = OutlineOptions::default();
    let doc = load_with_options(&bytes, &options)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), doc.pdf_version);
    println!("{}: {}", "Pages".bold(), doc.page_count());

    if let Some(ref title) = doc.info.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if let Some(ref author) = doc.info.author {
        println!("{}: {}", "Author".bold(), author);
    }
    if let Some(ref subject) = doc.info.subject {
        println!("{}: {}", "Subject".bold(), subject);
    }
    if let Some(ref created) = doc.info.created {
        println!("{}: {}", "Created".bold(), created);
    }

    println!();
    println!("{}", "Outline Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let stats = FontStatistics::from_document(&doc);
    let detection = HeadingDetector::new(&options).analyze(&doc);
    let resolved = doc.bookmarks.iter().filter(|b| b.target.is_some()).count();

    println!(
        "{}: {} ({} resolved)",
        "Bookmarks".bold(),
        doc.bookmarks.len(),
        resolved
    );
    println!("{}: {:.1}pt", "Body font size".bold(), stats.body_size);
    println!(
        "{}: {}",
        "Heading candidates".bold(),
        detection.candidates.len()
    );
    if let Some(ref title) = detection.title {
        println!("{}: {}", "Title block".bold(), title);
    }

    Ok(())
}

fn cmd_batch(
    input: &Path,
    output: Option<&Path>,
    numbered: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut files: Vec<PathBuf> = fs::read_dir(input)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .map_or(false, |ext| ext.eq_ignore_ascii_case("pdf"))
        })
        .collect();
    files.sort();

    if files.is_empty() {
        println!("{} {}", "No PDF files in".yellow(), input.display());
        return Ok(());
    }

    let output_dir = output.unwrap_or(input).to_path_buf();
    log::debug!(
        "Extracting {} files into {}",
        files.len(),
        output_dir.display()
    );
    fs::create_dir_all(&output_dir)?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let options = OutlineOptions::default();
    let failures: Vec<(PathBuf, String)> = files
        .par_iter()
        .filter_map(|path| {
            let result = outline_to_file(path, &output_dir, numbered, &options);
            pb.inc(1);
            result.err().map(|e| {
                log::warn!("{}: {}", path.display(), e);
                (path.clone(), e.to_string())
            })
        })
        .collect();

    pb.finish_with_message("Done!");

    println!(
        "\n{} {} of {} files",
        "Extracted".green().bold(),
        files.len() - failures.len(),
        files.len()
    );
    for (path, message) in &failures {
        println!("  {} {}: {}", "✗".red(), path.display(), message);
    }

    Ok(())
}

fn outline_to_file(
    path: &Path,
    output_dir: &Path,
    numbered: bool,
    options: &OutlineOptions,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let bytes = fs::read(path)?;
    let outline = extract_outline_with_options(&bytes, "", "", options)?;
    let render_options = RenderOptions::new().with_numbering(numbered);
    let markdown = paper_outline::render::to_markdown(&outline, &render_options)?;

    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    fs::write(output_dir.join(format!("{}.outline.md", stem)), markdown)?;
    Ok(())
}

fn cmd_arxiv_id(input: &str) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", parse_arxiv_id(input)?);
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "paper-outline".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Outline extraction for academic paper PDFs");
    println!();
    println!("License: MIT");
}
