use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use crate::model::PlaceRecord;
use crate::pdf::{ExtractedImage, ImageSet};

/// Pick the candidate with the largest file size. Ties break arbitrarily;
/// the source offers no secondary signal.
pub fn select_largest<'a>(
    candidates: impl Iterator<Item = &'a ExtractedImage>,
) -> Option<&'a ExtractedImage> {
    candidates.max_by_key(|img| img.size)
}

/// Copy each record's chosen image into `<out>/images/` and attach the
/// `image`/`image_path` fields. Records whose page produced no candidate
/// keep both fields absent. Returns the number of records with an image.
pub fn attach_images(records: &mut [PlaceRecord], set: &ImageSet, out_dir: &Path) -> Result<usize> {
    let images_dir = out_dir.join("images");
    fs::create_dir_all(&images_dir)
        .with_context(|| format!("creating {}", images_dir.display()))?;

    let pb = ProgressBar::new(records.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len}")?
            .progress_chars("=> "),
    );

    let mut attached = 0;
    for rec in records.iter_mut() {
        pb.inc(1);
        let Some(chosen) = select_largest(set.candidates(rec.pdf_page)) else {
            debug!(page = rec.pdf_page, "no candidate image");
            continue;
        };

        let base = if rec.title.is_empty() {
            format!("page_{}", rec.pdf_page)
        } else {
            rec.title.clone()
        };
        let ext = chosen
            .path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("png");
        let dest_name = format!("{:03}_{}.{}", rec.pdf_page, slugify(&base), ext);
        let dest = images_dir.join(&dest_name);
        fs::copy(&chosen.path, &dest)
            .with_context(|| format!("copying image to {}", dest.display()))?;

        rec.image = Some(dest_name.clone());
        rec.image_path = Some(format!("images/{}", dest_name));
        attached += 1;
    }
    pb.finish_and_clear();

    Ok(attached)
}

/// File-name slug: ASCII-fold the Latin accents the guide uses, squash
/// everything else to underscores.
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    for ch in value.chars().filter_map(fold_ascii) {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    let trimmed = slug.trim_matches('_');
    if trimmed.is_empty() {
        "place".to_string()
    } else {
        trimmed.to_string()
    }
}

fn fold_ascii(ch: char) -> Option<char> {
    Some(match ch {
        'ä' | 'à' | 'á' | 'â' | 'å' | 'Ä' | 'À' | 'Á' | 'Â' | 'Å' => 'a',
        'ö' | 'ò' | 'ó' | 'ô' | 'Ö' | 'Ò' | 'Ó' | 'Ô' => 'o',
        'ü' | 'ù' | 'ú' | 'û' | 'Ü' | 'Ù' | 'Ú' | 'Û' => 'u',
        'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' | 'Í' | 'Ì' | 'Î' | 'Ï' => 'i',
        'ñ' | 'Ñ' => 'n',
        'ç' | 'Ç' => 'c',
        'ß' => 's',
        c if c.is_ascii() => c,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::ExtractedImage;
    use std::path::PathBuf;

    fn img(page: usize, name: &str, size: u64) -> ExtractedImage {
        ExtractedImage {
            page,
            path: PathBuf::from(name),
            size,
        }
    }

    #[test]
    fn largest_candidate_wins() {
        let candidates = [
            img(5, "small.png", 10 * 1024),
            img(5, "big.png", 50 * 1024),
            img(5, "tiny.png", 3 * 1024),
        ];
        let chosen = select_largest(candidates.iter()).unwrap();
        assert_eq!(chosen.path, PathBuf::from("big.png"));
    }

    #[test]
    fn empty_candidates_yield_none() {
        assert!(select_largest(std::iter::empty()).is_none());
    }

    #[test]
    fn slugify_basic() {
        assert_eq!(slugify("Brandenburg Gate at Blue Hour"), "brandenburg_gate_at_blue_hour");
    }

    #[test]
    fn slugify_folds_accents() {
        assert_eq!(slugify("Müggelsee Brücke"), "muggelsee_brucke");
        assert_eq!(slugify("Café Straße"), "cafe_strase");
    }

    #[test]
    fn slugify_squashes_punctuation_runs() {
        assert_eq!(slugify("East Side Gallery -- Wall!"), "east_side_gallery_wall");
    }

    #[test]
    fn slugify_empty_falls_back() {
        assert_eq!(slugify(""), "place");
        assert_eq!(slugify("---"), "place");
    }

    #[test]
    fn attach_copies_largest_and_sets_paths() {
        let src = tempfile::tempdir().unwrap();
        let small = src.path().join("img-004-000.png");
        let big = src.path().join("img-004-001.png");
        std::fs::write(&small, vec![0u8; 100]).unwrap();
        std::fs::write(&big, vec![0u8; 4096]).unwrap();

        let set = ImageSet::new(vec![
            img_at(4, &small, 100),
            img_at(4, &big, 4096),
        ]);

        let out = tempfile::tempdir().unwrap();
        let mut records = vec![PlaceRecord {
            pdf_page: 4,
            title: "Spree View".to_string(),
            ..Default::default()
        }];
        let attached = attach_images(&mut records, &set, out.path()).unwrap();

        assert_eq!(attached, 1);
        assert_eq!(records[0].image.as_deref(), Some("004_spree_view.png"));
        assert_eq!(records[0].image_path.as_deref(), Some("images/004_spree_view.png"));
        let copied = out.path().join("images/004_spree_view.png");
        assert_eq!(std::fs::metadata(copied).unwrap().len(), 4096);
    }

    #[test]
    fn attach_leaves_record_without_candidates_untouched() {
        let set = ImageSet::new(vec![]);
        let out = tempfile::tempdir().unwrap();
        let mut records = vec![PlaceRecord {
            pdf_page: 9,
            title: "No Photo".to_string(),
            ..Default::default()
        }];
        let attached = attach_images(&mut records, &set, out.path()).unwrap();
        assert_eq!(attached, 0);
        assert!(records[0].image.is_none());
        assert!(records[0].image_path.is_none());
    }

    fn img_at(page: usize, path: &std::path::Path, size: u64) -> ExtractedImage {
        ExtractedImage {
            page,
            path: path.to_path_buf(),
            size,
        }
    }
}
