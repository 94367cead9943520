//! Line-level merge-marker generation for conflicted plain files
//!
//! Computes a zero-context line diff between the current and the
//! regenerated content, then re-emits the current file with each changed
//! hunk wrapped in conflict markers. Unchanged lines pass through
//! verbatim and the current file's line-break style is preserved.

pub const MARKER_CURRENT: &str = "<<<<<<< CURRENT";
pub const MARKER_SEPARATOR: &str = "=======";
pub const MARKER_UPGRADED: &str = ">>>>>>> UPGRADED";

/// One hunk of a zero-context line diff: `old_len` lines starting at
/// `old_start` are replaced by `new_len` lines starting at `new_start`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub old_start: usize,
    pub old_len: usize,
    pub new_start: usize,
    pub new_len: usize,
}

/// Ordered piece of a merged file: a run of unchanged lines from the
/// current file, or a conflicting old/new line pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HunkGroup {
    Unchanged(Vec<String>),
    Conflict { old: Vec<String>, new: Vec<String> },
}

/// Detect the line-break sequence used by `text`; `\n` when the text has
/// no line breaks at all
pub fn line_break_sequence(text: &str) -> &'static str {
    match text.find('\n') {
        Some(idx) if idx > 0 && text.as_bytes()[idx - 1] == b'\r' => "\r\n",
        _ => "\n",
    }
}

/// Split on `\r\n` or `\n`, keeping empty trailing segments like the
/// original content had them
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

/// Compute a zero-context line diff via longest-common-subsequence.
/// Adjacent delete/insert runs collapse into a single replace hunk.
pub fn diff_lines(old: &[&str], new: &[&str]) -> Vec<Hunk> {
    let n = old.len();
    let m = new.len();

    // LCS lengths for every suffix pair
    let width = m + 1;
    let mut table = vec![0u32; (n + 1) * width];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            table[i * width + j] = if old[i] == new[j] {
                table[(i + 1) * width + j + 1] + 1
            } else {
                table[(i + 1) * width + j].max(table[i * width + j + 1])
            };
        }
    }

    let mut hunks: Vec<Hunk> = Vec::new();
    let mut open: Option<Hunk> = None;
    let (mut i, mut j) = (0usize, 0usize);
    while i < n || j < m {
        if i < n && j < m && old[i] == new[j] {
            if let Some(hunk) = open.take() {
                hunks.push(hunk);
            }
            i += 1;
            j += 1;
            continue;
        }

        let take_old =
            j >= m || (i < n && table[(i + 1) * width + j] >= table[i * width + j + 1]);
        let hunk = open.get_or_insert(Hunk {
            old_start: i,
            old_len: 0,
            new_start: j,
            new_len: 0,
        });
        if take_old {
            hunk.old_len += 1;
            i += 1;
        } else {
            hunk.new_len += 1;
            j += 1;
        }
    }
    if let Some(hunk) = open {
        hunks.push(hunk);
    }

    hunks
}

/// Group current/new lines into unchanged runs and conflict pairs
pub fn group_hunks(current: &[&str], new: &[&str], hunks: &[Hunk]) -> Vec<HunkGroup> {
    let mut groups = Vec::new();
    let mut last = 0usize;

    for hunk in hunks {
        if hunk.old_start > last {
            groups.push(HunkGroup::Unchanged(to_owned(&current[last..hunk.old_start])));
        }
        groups.push(HunkGroup::Conflict {
            old: to_owned(&current[hunk.old_start..hunk.old_start + hunk.old_len]),
            new: to_owned(&new[hunk.new_start..hunk.new_start + hunk.new_len]),
        });
        last = hunk.old_start + hunk.old_len;
    }
    if last < current.len() {
        groups.push(HunkGroup::Unchanged(to_owned(&current[last..])));
    }

    groups
}

/// Merge `new` into `current`, annotating every changed hunk with conflict
/// markers. Zero hunks means the output equals the input.
pub fn merge_text(current: &str, new: &str) -> String {
    let newline = line_break_sequence(current);
    let current_lines = split_lines(current);
    let new_lines = split_lines(new);

    let hunks = diff_lines(&current_lines, &new_lines);
    let groups = group_hunks(&current_lines, &new_lines, &hunks);

    let mut out: Vec<&str> = Vec::new();
    for group in &groups {
        match group {
            HunkGroup::Unchanged(lines) => out.extend(lines.iter().map(String::as_str)),
            HunkGroup::Conflict { old, new } => {
                out.push(MARKER_CURRENT);
                out.extend(old.iter().map(String::as_str));
                out.push(MARKER_SEPARATOR);
                out.extend(new.iter().map(String::as_str));
                out.push(MARKER_UPGRADED);
            }
        }
    }
    out.join(newline)
}

fn to_owned(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|line| line.to_string()).collect()
}
