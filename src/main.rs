mod images;
mod model;
mod output;
mod parser;
mod pdf;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use pdf::{ImageSource, TextSource};

#[derive(Parser)]
#[command(name = "guide_extract", about = "Extract photo spots and images from a photo-guide PDF")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse the PDF into places.json, with one image per place
    Extract {
        /// Path to the guide PDF
        pdf: PathBuf,
        /// Output directory
        #[arg(long, default_value = "output")]
        out: PathBuf,
        /// First PDF page to process (1-based)
        #[arg(long)]
        page_min: Option<usize>,
        /// Last PDF page to process (1-based)
        #[arg(long)]
        page_max: Option<usize>,
        /// Append to an existing places.json instead of overwriting
        #[arg(long)]
        append: bool,
        /// Skip image extraction
        #[arg(long)]
        skip_images: bool,
    },
    /// Places overview table from an existing places.json
    Overview {
        /// Output directory holding places.json
        #[arg(long, default_value = "output")]
        out: PathBuf,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            pdf,
            out,
            page_min,
            page_max,
            append,
            skip_images,
        } => run_extract(
            &pdf::PopplerTools,
            &pdf,
            &out,
            page_min,
            page_max,
            append,
            skip_images,
        ),
        Commands::Overview { out, limit } => run_overview(&out, limit),
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn run_extract<T: TextSource + ImageSource>(
    tools: &T,
    pdf_path: &std::path::Path,
    out: &std::path::Path,
    page_min: Option<usize>,
    page_max: Option<usize>,
    append: bool,
    skip_images: bool,
) -> Result<()> {
    // Page numbers are 1-based; a 0 would underflow the offset below.
    let page_min = page_min.map(|p| p.max(1));

    let pages = tools.page_texts(pdf_path, page_min, page_max)?;
    info!("Parsing {} page blocks", pages.len());

    let mut records = parser::extract_places(&pages);

    // Records parsed from a sliced range carry slice-relative page numbers;
    // shift them back to absolute document pages.
    let offset = page_min.unwrap_or(1) - 1;
    if offset > 0 {
        for rec in &mut records {
            rec.shift_pages(offset);
        }
    }
    info!("Found {} places", records.len());

    if !skip_images && !records.is_empty() {
        let first = records.iter().map(|r| r.pdf_page).min().unwrap_or(1);
        let last = records.iter().map(|r| r.pdf_page).max().unwrap_or(first);
        let set = tools.page_images(pdf_path, first, last)?;
        if set.is_empty() {
            info!("No candidate images in pages {}-{}", first, last);
        }
        let attached = images::attach_images(&mut records, &set, out)?;
        info!("Attached images to {} of {} places", attached, records.len());
    }

    let (path, total) = output::write_places(out, records, append)?;
    println!("Wrote {} places to {}", total, path.display());
    Ok(())
}

fn run_overview(out: &std::path::Path, limit: usize) -> Result<()> {
    let records = output::read_places(out)?;
    if records.is_empty() {
        println!("No places found. Run 'extract' first.");
        return Ok(());
    }

    println!(
        "{:>3} | {:>4} | {:<32} | {:<28} | {:<22} | {:<3}",
        "#", "Page", "Title", "Location", "Coordinates", "Img"
    );
    println!("{}", "-".repeat(108));

    for (i, r) in records.iter().take(limit).enumerate() {
        let coords = r
            .coordinates
            .map(|c| format!("{:.5}, {:.5}", c.lat, c.lng))
            .unwrap_or_else(|| "-".into());
        println!(
            "{:>3} | {:>4} | {:<32} | {:<28} | {:<22} | {:<3}",
            i + 1,
            r.pdf_page,
            truncate(&r.title, 32),
            truncate(&r.location, 28),
            coords,
            if r.image.is_some() { "yes" } else { "-" },
        );
    }

    println!("\n{} places total", records.len());
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max - 3).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use pdf::ImageSet;
    use std::path::Path;

    /// Text/image collaborator backed by in-memory pages, honoring the same
    /// page-range contract as the real tools.
    struct FakeTools {
        pages: Vec<String>,
    }

    impl TextSource for FakeTools {
        fn page_texts(
            &self,
            _pdf: &Path,
            first: Option<usize>,
            last: Option<usize>,
        ) -> Result<Vec<String>> {
            let first = first.unwrap_or(1);
            let last = last.unwrap_or(self.pages.len());
            Ok(self.pages[first - 1..last].to_vec())
        }
    }

    impl ImageSource for FakeTools {
        fn page_images(&self, _pdf: &Path, _first: usize, _last: usize) -> Result<ImageSet> {
            Ok(ImageSet::new(vec![]))
        }
    }

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.txt", name)).unwrap()
    }

    #[test]
    fn extract_pipeline_with_fake_tools() {
        let tools = FakeTools {
            pages: vec![fixture("intro"), fixture("brandenburg_gate")],
        };
        let out = tempfile::tempdir().unwrap();
        run_extract(&tools, Path::new("guide.pdf"), out.path(), None, None, false, true).unwrap();

        let records = output::read_places(out.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].pdf_page, 2);
        assert!(records[0].image.is_none());
    }

    #[test]
    fn page_range_shifts_to_absolute_numbers() {
        let tools = FakeTools {
            pages: vec![
                fixture("intro"),
                fixture("brandenburg_gate"),
                fixture("oberbaum_bridge_p1"),
                fixture("oberbaum_bridge_p2"),
            ],
        };
        let out = tempfile::tempdir().unwrap();
        // Slice pages 3..4: the parser sees them as pages 1..2.
        run_extract(
            &tools,
            Path::new("guide.pdf"),
            out.path(),
            Some(3),
            Some(4),
            false,
            true,
        )
        .unwrap();

        let records = output::read_places(out.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].pdf_page, 3);
        assert_eq!(records[0].detail_page, Some(4));
    }

    #[test]
    fn page_min_zero_is_treated_as_page_one() {
        let tools = FakeTools {
            pages: vec![fixture("intro"), fixture("brandenburg_gate")],
        };
        let out = tempfile::tempdir().unwrap();
        run_extract(
            &tools,
            Path::new("guide.pdf"),
            out.path(),
            Some(0),
            None,
            false,
            true,
        )
        .unwrap();

        let records = output::read_places(out.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].pdf_page, 2);
    }

    #[test]
    fn truncate_is_char_safe() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long place title", 10), "a very ...");
    }
}
