use std::cmp::Ordering;

use crate::core::{FileFilter, SortMode};
use crate::fs::FsEntry;

/// How a raw directory listing is narrowed and ordered.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ListingRules<'a> {
    pub show_hidden: bool,
    pub directories_only: bool,
    pub filter: Option<&'a FileFilter>,
    pub sort_mode: SortMode,
    pub reversed: bool,
    pub directories_first: bool,
}

pub(crate) fn apply(entries: &mut Vec<FsEntry>, rules: &ListingRules<'_>) {
    entries.retain(|e| {
        if !rules.show_hidden && e.is_hidden() {
            return false;
        }
        if e.is_dir {
            return true;
        }
        !rules.directories_only && rules.filter.is_none_or(|f| f.matches(&e.name))
    });
    sort_entries_in_place(entries, rules);
}

fn sort_entries_in_place(entries: &mut [FsEntry], rules: &ListingRules<'_>) {
    entries.sort_by(|a, b| {
        if rules.directories_first && a.is_dir != b.is_dir {
            return b.is_dir.cmp(&a.is_dir);
        }
        let ord = match rules.sort_mode {
            SortMode::DisplayName => natural_cmp(&a.name, &b.name),
            SortMode::ModificationTime => a
                .modified
                .cmp(&b.modified)
                .then_with(|| natural_cmp(&a.name, &b.name)),
        };
        if rules.reversed { ord.reverse() } else { ord }
    });
}

/// Case-insensitive comparison where digit runs compare by numeric value, so
/// `file2` sorts before `file10`.
pub(crate) fn natural_cmp(a: &str, b: &str) -> Ordering {
    let al = a.to_lowercase();
    let bl = b.to_lowercase();
    let (ab, bb) = (al.as_bytes(), bl.as_bytes());
    let (mut i, mut j) = (0usize, 0usize);

    while i < ab.len() && j < bb.len() {
        if ab[i].is_ascii_digit() && bb[j].is_ascii_digit() {
            let a_run = digit_run(ab, i);
            let b_run = digit_run(bb, j);
            let a_val = trim_zeros(&ab[i..a_run]);
            let b_val = trim_zeros(&bb[j..b_run]);
            let ord = a_val
                .len()
                .cmp(&b_val.len())
                .then_with(|| a_val.cmp(b_val))
                // Same value: fewer leading zeros first.
                .then_with(|| (a_run - i).cmp(&(b_run - j)));
            if ord != Ordering::Equal {
                return ord;
            }
            i = a_run;
            j = b_run;
            continue;
        }
        if ab[i] != bb[j] {
            return ab[i].cmp(&bb[j]);
        }
        i += 1;
        j += 1;
    }

    (ab.len() - i).cmp(&(bb.len() - j)).then_with(|| a.cmp(b))
}

fn digit_run(bytes: &[u8], start: usize) -> usize {
    let mut end = start;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    end
}

fn trim_zeros(digits: &[u8]) -> &[u8] {
    let first = digits.iter().position(|&d| d != b'0').unwrap_or(digits.len());
    &digits[first..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime};

    fn entry(name: &str, is_dir: bool, age_secs: u64) -> FsEntry {
        FsEntry {
            name: name.to_string(),
            path: PathBuf::from("/t").join(name),
            is_dir,
            is_symlink: false,
            size: if is_dir { None } else { Some(1) },
            modified: Some(SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000 - age_secs)),
        }
    }

    fn names(entries: &[FsEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    fn rules() -> ListingRules<'static> {
        ListingRules {
            show_hidden: false,
            directories_only: false,
            filter: None,
            sort_mode: SortMode::DisplayName,
            reversed: false,
            directories_first: true,
        }
    }

    #[test]
    fn natural_order_compares_numbers_by_value() {
        assert_eq!(natural_cmp("file2", "file10"), Ordering::Less);
        assert_eq!(natural_cmp("File10", "file9"), Ordering::Greater);
        assert_eq!(natural_cmp("a01", "a1"), Ordering::Greater);
        assert_eq!(natural_cmp("abc", "ABC.txt"), Ordering::Less);
    }

    #[test]
    fn directories_first_then_natural_names() {
        let mut v = vec![
            entry("b10.txt", false, 0),
            entry("zeta", true, 0),
            entry("b2.txt", false, 0),
            entry("alpha", true, 0),
        ];
        apply(&mut v, &rules());
        assert_eq!(names(&v), ["alpha", "zeta", "b2.txt", "b10.txt"]);
    }

    #[test]
    fn hidden_entries_dropped_unless_requested() {
        let mut v = vec![entry(".cache", true, 0), entry("a.txt", false, 0)];
        apply(&mut v, &rules());
        assert_eq!(names(&v), ["a.txt"]);

        let mut v = vec![entry(".cache", true, 0), entry("a.txt", false, 0)];
        apply(&mut v, &ListingRules { show_hidden: true, ..rules() });
        assert_eq!(names(&v), [".cache", "a.txt"]);
    }

    #[test]
    fn filter_keeps_directories() {
        let filter = FileFilter::new("Text", ["txt"]);
        let mut v = vec![
            entry("docs", true, 0),
            entry("a.txt", false, 0),
            entry("b.png", false, 0),
        ];
        apply(&mut v, &ListingRules { filter: Some(&filter), ..rules() });
        assert_eq!(names(&v), ["docs", "a.txt"]);
    }

    #[test]
    fn directories_only_drops_files() {
        let mut v = vec![entry("docs", true, 0), entry("a.txt", false, 0)];
        apply(&mut v, &ListingRules { directories_only: true, ..rules() });
        assert_eq!(names(&v), ["docs"]);
    }

    #[test]
    fn modification_time_sort_can_be_reversed() {
        let mut v = vec![
            entry("new.txt", false, 10),
            entry("old.txt", false, 500),
            entry("mid.txt", false, 100),
        ];
        let by_time = ListingRules {
            sort_mode: SortMode::ModificationTime,
            ..rules()
        };
        apply(&mut v, &by_time);
        assert_eq!(names(&v), ["old.txt", "mid.txt", "new.txt"]);
        apply(&mut v, &ListingRules { reversed: true, ..by_time });
        assert_eq!(names(&v), ["new.txt", "mid.txt", "old.txt"]);
    }
}
