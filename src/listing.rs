//! Directory listing for the browser and the image list.

use std::borrow::Cow;
use std::cmp::Ordering;

use tracing::{debug, warn};

use crate::storage::Storage;

/// Names that never show up in a listing besides dot-files.
const SYSTEM_VOLUME_NAME: &str = "System Volume Information";
const HIDDEN_MARKER: char = '.';

/// Label drawn for [`ListEntry::StartSlideshow`].
pub const SLIDESHOW_LABEL: &str = "< Slideshow >";

/// One row of the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEntry {
    /// Synthetic first row, present when the directory holds images.
    StartSlideshow,
    Directory(String),
    Image(String),
}

impl ListEntry {
    /// Display text; directories carry a trailing `/`.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::StartSlideshow => SLIDESHOW_LABEL.to_string(),
            Self::Directory(name) => format!("{name}/"),
            Self::Image(name) => name.clone(),
        }
    }

    /// Text the ordering compares: directories keep their trailing `/`, so
    /// `photos 2023/` sorts before `photos/`.
    fn sort_key(&self) -> Cow<'_, str> {
        match self {
            Self::StartSlideshow => Cow::Borrowed(""),
            Self::Directory(_) => Cow::Owned(self.label()),
            Self::Image(name) => Cow::Borrowed(name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Bitmap,
    Jpeg,
}

impl ImageKind {
    /// Classify by extension, case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "bmp" => Some(Self::Bitmap),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }
}

/// Return `true` if `name` has a supported image extension.
#[must_use]
pub fn is_image(name: &str) -> bool {
    ImageKind::from_name(name).is_some()
}

fn is_hidden(name: &str) -> bool {
    name.starts_with(HIDDEN_MARKER) || name == SYSTEM_VOLUME_NAME
}

/// Directories first, then case-insensitive character order of the labels.
fn compare_entries(a: &ListEntry, b: &ListEntry) -> Ordering {
    let rank = |e: &ListEntry| match e {
        ListEntry::StartSlideshow => 0,
        ListEntry::Directory(_) => 1,
        ListEntry::Image(_) => 2,
    };
    rank(a)
        .cmp(&rank(b))
        .then_with(|| compare_names(&a.sort_key(), &b.sort_key()))
}

/// Case-insensitive lexicographic comparison, character by character.
#[must_use]
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// Sort rows into browser order. A [`ListEntry::StartSlideshow`] row always
/// sorts first.
pub fn sort_entries(entries: &mut [ListEntry]) {
    entries.sort_by(compare_entries);
}

/// Visible directories and images of `path`. A directory that cannot be read
/// yields an empty list.
fn visible_children(storage: &dyn Storage, path: &str) -> Vec<ListEntry> {
    let children = match storage.read_dir(path) {
        Ok(children) => children,
        Err(err) => {
            warn!(path, error = %err, "directory not listable; showing empty list");
            return Vec::new();
        }
    };
    children
        .into_iter()
        .filter(|c| !is_hidden(&c.name))
        .filter_map(|c| {
            if c.is_dir {
                Some(ListEntry::Directory(c.name))
            } else if is_image(&c.name) {
                Some(ListEntry::Image(c.name))
            } else {
                None
            }
        })
        .collect()
}

/// Browser rows for `path`: sorted directories and images, led by the
/// slideshow row when at least one image is present.
#[must_use]
pub fn list_entries(storage: &dyn Storage, path: &str) -> Vec<ListEntry> {
    let mut entries = visible_children(storage, path);
    sort_entries(&mut entries);
    if entries.iter().any(|e| matches!(e, ListEntry::Image(_))) {
        entries.insert(0, ListEntry::StartSlideshow);
    }
    debug!(path, count = entries.len(), "listed directory");
    entries
}

/// Image names of `path` in browser order.
#[must_use]
pub fn list_images(storage: &dyn Storage, path: &str) -> Vec<String> {
    let mut entries = visible_children(storage, path);
    entries.retain(|e| matches!(e, ListEntry::Image(_)));
    sort_entries(&mut entries);
    entries
        .into_iter()
        .filter_map(|e| match e {
            ListEntry::Image(name) => Some(name),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::LocalStorage;
    use std::fs;

    fn dir(name: &str) -> ListEntry {
        ListEntry::Directory(name.to_string())
    }

    fn img(name: &str) -> ListEntry {
        ListEntry::Image(name.to_string())
    }

    #[test]
    fn classifies_extensions_case_insensitively() {
        assert_eq!(ImageKind::from_name("a.BMP"), Some(ImageKind::Bitmap));
        assert_eq!(ImageKind::from_name("a.Jpg"), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::from_name("a.jpeg"), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::from_name("a.png"), None);
        assert_eq!(ImageKind::from_name("jpg"), None);
    }

    #[test]
    fn directories_precede_files_and_names_ignore_case() {
        let mut entries = vec![
            img("b.jpg"),
            dir("zeta"),
            img("A.bmp"),
            dir("Alpha"),
            img("c.jpeg"),
        ];
        sort_entries(&mut entries);
        assert_eq!(
            entries,
            vec![dir("Alpha"), dir("zeta"), img("A.bmp"), img("b.jpg"), img("c.jpeg")]
        );
    }

    #[test]
    fn directory_separator_takes_part_in_ordering() {
        let mut entries = vec![dir("photos"), dir("photos 2023"), dir("photos-old")];
        sort_entries(&mut entries);
        let labels: Vec<String> = entries.iter().map(ListEntry::label).collect();
        assert_eq!(labels, vec!["photos 2023/", "photos-old/", "photos/"]);
    }

    #[test]
    fn shorter_prefix_sorts_first() {
        assert_eq!(compare_names("img", "IMG2"), Ordering::Less);
        assert_eq!(compare_names("Abc", "abc"), Ordering::Equal);
    }

    #[test]
    fn scenario_listing_order_with_slideshow_row() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("b.jpg"), b"x").unwrap();
        fs::create_dir(tmp.path().join("A")).unwrap();
        fs::write(tmp.path().join("a.bmp"), b"x").unwrap();
        let storage = LocalStorage::new(tmp.path());

        let entries = list_entries(&storage, "/");
        let labels: Vec<String> = entries.iter().map(ListEntry::label).collect();
        assert_eq!(labels, vec![SLIDESHOW_LABEL, "A/", "a.bmp", "b.jpg"]);
        assert_eq!(entries[0], ListEntry::StartSlideshow);

        assert_eq!(list_images(&storage, "/"), vec!["a.bmp", "b.jpg"]);
    }

    #[test]
    fn no_slideshow_row_without_images() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();
        fs::write(tmp.path().join("notes.txt"), b"x").unwrap();
        let storage = LocalStorage::new(tmp.path());

        assert_eq!(list_entries(&storage, "/"), vec![dir("sub")]);
        assert!(list_images(&storage, "/").is_empty());
    }

    #[test]
    fn hidden_and_system_entries_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join(".hidden.jpg"), b"x").unwrap();
        fs::create_dir(tmp.path().join(".trash")).unwrap();
        fs::create_dir(tmp.path().join(SYSTEM_VOLUME_NAME)).unwrap();
        fs::write(tmp.path().join("shown.bmp"), b"x").unwrap();
        let storage = LocalStorage::new(tmp.path());

        assert_eq!(
            list_entries(&storage, "/"),
            vec![ListEntry::StartSlideshow, img("shown.bmp")]
        );
    }

    #[test]
    fn real_file_named_like_the_slideshow_row_is_an_image() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("< Slideshow >.bmp"), b"x").unwrap();
        let storage = LocalStorage::new(tmp.path());

        let entries = list_entries(&storage, "/");
        assert_eq!(
            entries,
            vec![ListEntry::StartSlideshow, img("< Slideshow >.bmp")]
        );
    }

    #[test]
    fn unreadable_directory_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(tmp.path());
        assert!(list_entries(&storage, "/missing/").is_empty());
        assert!(list_images(&storage, "/missing/").is_empty());
    }
}
