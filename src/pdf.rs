use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;

use anyhow::{bail, Context, Result};
use regex::Regex;
use tempfile::TempDir;
use tracing::{debug, info};

// pdfimages names its output img-<page>-<index>.<ext>
static IMG_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^img-(\d+)-(\d+)\.(\w+)$").unwrap());

/// Page texts for a document: one block per page, in page order, with the
/// original line breaks and spacing preserved (the two-column splitter
/// depends on runs of two or more spaces surviving).
pub trait TextSource {
    fn page_texts(
        &self,
        pdf: &Path,
        first: Option<usize>,
        last: Option<usize>,
    ) -> Result<Vec<String>>;
}

/// Raster images found in an inclusive page range, each tagged with the page
/// it was found on. Multiple images per page are possible.
pub trait ImageSource {
    fn page_images(&self, pdf: &Path, first: usize, last: usize) -> Result<ImageSet>;
}

/// One extracted candidate image.
#[derive(Debug, Clone)]
pub struct ExtractedImage {
    pub page: usize,
    pub path: PathBuf,
    pub size: u64,
}

/// Candidate images keyed by page. Holds the extraction temp dir alive until
/// the chosen files have been copied out.
pub struct ImageSet {
    images: Vec<ExtractedImage>,
    _tmp: Option<TempDir>,
}

impl ImageSet {
    pub fn new(images: Vec<ExtractedImage>) -> Self {
        Self { images, _tmp: None }
    }

    pub fn candidates(&self, page: usize) -> impl Iterator<Item = &ExtractedImage> {
        self.images.iter().filter(move |img| img.page == page)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Production collaborator: shells out to poppler's pdftotext/pdfimages.
/// A tool failure is fatal and aborts the run.
pub struct PopplerTools;

impl TextSource for PopplerTools {
    fn page_texts(
        &self,
        pdf: &Path,
        first: Option<usize>,
        last: Option<usize>,
    ) -> Result<Vec<String>> {
        let tmp = TempDir::new().context("creating temp dir for pdftotext")?;
        let out_path = tmp.path().join("pages.txt");

        let mut cmd = Command::new("pdftotext");
        cmd.arg("-layout");
        if let Some(first) = first {
            cmd.args(["-f", &first.to_string()]);
        }
        if let Some(last) = last {
            cmd.args(["-l", &last.to_string()]);
        }
        cmd.arg(pdf).arg(&out_path);
        run(cmd)?;

        // pdftotext output is not guaranteed to be valid UTF-8.
        let bytes = fs::read(&out_path)
            .with_context(|| format!("reading pdftotext output {}", out_path.display()))?;
        let text = String::from_utf8_lossy(&bytes);

        let pages = split_page_blocks(&text);
        info!("pdftotext produced {} page blocks", pages.len());
        Ok(pages)
    }
}

/// One block per page, separated by form feeds. pdftotext emits a terminal
/// form feed, so the split leaves an empty block past the last real page;
/// it must not reach the continuation merger, which would consume it as a
/// phantom detail page.
fn split_page_blocks(text: &str) -> Vec<String> {
    let mut pages: Vec<String> = text.split('\u{c}').map(str::to_string).collect();
    if pages.last().is_some_and(|p| p.is_empty()) {
        pages.pop();
    }
    pages
}

impl ImageSource for PopplerTools {
    fn page_images(&self, pdf: &Path, first: usize, last: usize) -> Result<ImageSet> {
        let tmp = TempDir::new().context("creating temp dir for pdfimages")?;
        let prefix = tmp.path().join("img");

        let mut cmd = Command::new("pdfimages");
        cmd.args(["-png", "-p"])
            .args(["-f", &first.to_string()])
            .args(["-l", &last.to_string()])
            .arg(pdf)
            .arg(&prefix);
        run(cmd)?;

        let mut images = Vec::new();
        for entry in fs::read_dir(tmp.path()).context("listing pdfimages output")? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(caps) = name.to_str().and_then(|n| IMG_NAME_RE.captures(n)) else {
                continue;
            };
            let page: usize = caps[1].parse()?;
            let size = entry.metadata()?.len();
            images.push(ExtractedImage {
                page,
                path: entry.path(),
                size,
            });
        }
        info!("pdfimages produced {} images for pages {}-{}", images.len(), first, last);

        Ok(ImageSet {
            images,
            _tmp: Some(tmp),
        })
    }
}

fn run(mut cmd: Command) -> Result<()> {
    debug!(?cmd, "running external tool");
    let status = cmd
        .status()
        .with_context(|| format!("failed to run {:?}", cmd.get_program()))?;
    if !status.success() {
        bail!("{:?} exited with {}", cmd.get_program(), status);
    }
    Ok(())
}
