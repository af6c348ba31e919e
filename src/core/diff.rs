//! Line diff type.
//!
//! Compares two serialized stores line by line and renders the result as a
//! unified diff, for review before a write.

/// How a single line changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStatus {
    /// Present in both versions.
    Unchanged,
    /// Only in the old version.
    Removed,
    /// Only in the new version.
    Added,
}

/// A single line in a diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    text: String,
    status: LineStatus,
}

impl DiffLine {
    fn new(text: &str, status: LineStatus) -> Self {
        Self {
            text: text.to_string(),
            status,
        }
    }

    /// The line, without its newline.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// How the line changed.
    pub fn status(&self) -> LineStatus {
        self.status
    }

    /// Whether the line differs between versions.
    pub fn is_change(&self) -> bool {
        self.status != LineStatus::Unchanged
    }

    fn prefix(&self) -> char {
        match self.status {
            LineStatus::Unchanged => ' ',
            LineStatus::Removed => '-',
            LineStatus::Added => '+',
        }
    }
}

/// The full line diff between two texts.
#[derive(Debug, Clone)]
pub struct Diff {
    lines: Vec<DiffLine>,
}

impl Diff {
    /// Compute the diff between `old` and `new`.
    ///
    /// Common leading and trailing lines are matched directly; the remainder
    /// is aligned by longest common subsequence. Past [`MAX_ALIGN_CELLS`] the
    /// remainder is shown as a block removal followed by a block addition.
    pub fn compute(old: &str, new: &str) -> Self {
        let a: Vec<&str> = old.lines().collect();
        let b: Vec<&str> = new.lines().collect();

        let prefix = a.iter().zip(&b).take_while(|(x, y)| x == y).count();
        let suffix = a[prefix..]
            .iter()
            .rev()
            .zip(b[prefix..].iter().rev())
            .take_while(|(x, y)| x == y)
            .count();

        let mut lines: Vec<DiffLine> = a[..prefix]
            .iter()
            .map(|l| DiffLine::new(l, LineStatus::Unchanged))
            .collect();
        lines.extend(align(
            &a[prefix..a.len() - suffix],
            &b[prefix..b.len() - suffix],
        ));
        lines.extend(
            a[a.len() - suffix..]
                .iter()
                .map(|l| DiffLine::new(l, LineStatus::Unchanged)),
        );

        Self { lines }
    }

    /// All lines, in order.
    pub fn lines(&self) -> &[DiffLine] {
        &self.lines
    }

    /// Whether the texts differ.
    pub fn has_changes(&self) -> bool {
        self.lines.iter().any(DiffLine::is_change)
    }

    /// Number of added lines.
    pub fn added(&self) -> usize {
        self.count(LineStatus::Added)
    }

    /// Number of removed lines.
    pub fn removed(&self) -> usize {
        self.count(LineStatus::Removed)
    }

    fn count(&self, status: LineStatus) -> usize {
        self.lines.iter().filter(|l| l.status == status).count()
    }

    /// Render as a unified diff with `context` lines around each change.
    ///
    /// Empty when nothing changed.
    pub fn unified(&self, old_label: &str, new_label: &str, context: usize) -> String {
        if !self.has_changes() {
            return String::new();
        }

        let mut out = format!("--- {}\n+++ {}\n", old_label, new_label);
        for (start, end) in self.hunks(context) {
            out.push_str(&self.hunk_header(start, end));
            for line in &self.lines[start..end] {
                out.push(line.prefix());
                out.push_str(&line.text);
                out.push('\n');
            }
        }
        out
    }

    /// Index ranges of lines to print, merged where contexts overlap.
    fn hunks(&self, context: usize) -> Vec<(usize, usize)> {
        let mut hunks: Vec<(usize, usize)> = Vec::new();
        for (i, _) in self.lines.iter().enumerate().filter(|(_, l)| l.is_change()) {
            let start = i.saturating_sub(context);
            let end = (i + context + 1).min(self.lines.len());
            match hunks.last_mut() {
                Some(last) if start <= last.1 => last.1 = end,
                _ => hunks.push((start, end)),
            }
        }
        hunks
    }

    fn hunk_header(&self, start: usize, end: usize) -> String {
        let before = &self.lines[..start];
        let old_start = before.iter().filter(|l| l.status != LineStatus::Added).count();
        let new_start = before.iter().filter(|l| l.status != LineStatus::Removed).count();

        let hunk = &self.lines[start..end];
        let old_len = hunk.iter().filter(|l| l.status != LineStatus::Added).count();
        let new_len = hunk.iter().filter(|l| l.status != LineStatus::Removed).count();

        format!(
            "@@ -{} +{} @@\n",
            format_range(old_start, old_len),
            format_range(new_start, new_len)
        )
    }
}

/// `start,len` with 1-based start; a single line omits the length and an
/// empty range points at the line before it.
fn format_range(start: usize, len: usize) -> String {
    match len {
        1 => format!("{}", start + 1),
        0 => format!("{},0", start),
        _ => format!("{},{}", start + 1, len),
    }
}

/// Largest LCS table (old lines × new lines) built for one diff.
pub const MAX_ALIGN_CELLS: usize = 4_000_000;

/// LCS alignment of two line slices.
fn align(a: &[&str], b: &[&str]) -> Vec<DiffLine> {
    let (n, m) = (a.len(), b.len());
    if (n + 1).saturating_mul(m + 1) > MAX_ALIGN_CELLS {
        return a
            .iter()
            .map(|l| DiffLine::new(l, LineStatus::Removed))
            .chain(b.iter().map(|l| DiffLine::new(l, LineStatus::Added)))
            .collect();
    }

    // table[i][j] = LCS length of a[i..] and b[j..]
    let mut table = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            table[i][j] = if a[i] == b[j] {
                table[i + 1][j + 1] + 1
            } else {
                table[i + 1][j].max(table[i][j + 1])
            };
        }
    }

    let mut lines = Vec::with_capacity(n + m);
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if a[i] == b[j] {
            lines.push(DiffLine::new(a[i], LineStatus::Unchanged));
            i += 1;
            j += 1;
        } else if table[i + 1][j] >= table[i][j + 1] {
            lines.push(DiffLine::new(a[i], LineStatus::Removed));
            i += 1;
        } else {
            lines.push(DiffLine::new(b[j], LineStatus::Added));
            j += 1;
        }
    }
    lines.extend(a[i..].iter().map(|l| DiffLine::new(l, LineStatus::Removed)));
    lines.extend(b[j..].iter().map(|l| DiffLine::new(l, LineStatus::Added)));
    lines
}
