//! Line-level edit scripts.
//!
//! [`diff_lines`] splits both texts into lines (each keeping its trailing
//! newline) and runs Myers' O(ND) shortest-edit-script search on them, in
//! its linear-space form. Consecutive lines with the same tag are merged
//! into one [`Hunk`].

use std::collections::HashMap;

/// How a run of lines relates the old text to the new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HunkKind {
    /// Lines present only in the new text.
    Added,
    /// Lines present only in the old text.
    Removed,
    /// Lines present in both texts.
    Unchanged,
}

/// A run of consecutive lines sharing one [`HunkKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    kind: HunkKind,
    text: String,
}

impl Hunk {
    /// Creates a hunk.
    pub fn new(kind: HunkKind, text: impl Into<String>) -> Self {
        Hunk {
            kind,
            text: text.into(),
        }
    }

    /// Returns the kind of this hunk.
    pub fn kind(&self) -> HunkKind {
        self.kind
    }

    /// Returns the literal text of the lines, newlines included.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the number of lines in this hunk.
    pub fn line_count(&self) -> usize {
        self.text.split_inclusive('\n').count()
    }

    /// Returns true for added and removed hunks.
    pub fn is_change(&self) -> bool {
        self.kind != HunkKind::Unchanged
    }
}

/// A single line-level edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edit<'a> {
    Keep(&'a str),
    Insert(&'a str),
    Delete(&'a str),
}

/// Computes the edit script turning `old` into `new`.
///
/// The script is minimal: its unchanged lines form a longest common
/// subsequence of the two texts. Within a changed region, removed lines
/// come before added lines. Identical inputs yield a single unchanged
/// hunk; two empty inputs yield no hunks at all.
pub fn diff_lines(old: &str, new: &str) -> Vec<Hunk> {
    let a: Vec<&str> = old.split_inclusive('\n').collect();
    let b: Vec<&str> = new.split_inclusive('\n').collect();

    let mut edits: Vec<Edit<'_>> = Vec::with_capacity(a.len().max(b.len()));
    let (mut x, mut y) = (0, 0);
    for (i, j) in matching_lines(&a, &b) {
        edits.extend(a[x..i].iter().map(|l| Edit::Delete(*l)));
        edits.extend(b[y..j].iter().map(|l| Edit::Insert(*l)));
        edits.push(Edit::Keep(a[i]));
        x = i + 1;
        y = j + 1;
    }
    edits.extend(a[x..].iter().map(|l| Edit::Delete(*l)));
    edits.extend(b[y..].iter().map(|l| Edit::Insert(*l)));

    group(&edits)
}

/// Returns the index pairs `(i, j)` with `a[i] == b[j]` of a longest
/// common subsequence, in increasing order.
///
/// Lines are interned first. A line that never occurs on the other side
/// cannot be part of any common subsequence, so it is left out of the
/// search; a file rewritten line by line then costs no search at all.
fn matching_lines(a: &[&str], b: &[&str]) -> Vec<(usize, usize)> {
    let mut ids: HashMap<&str, usize> = HashMap::new();
    let a_ids: Vec<usize> = a.iter().map(|l| intern(&mut ids, *l)).collect();
    let b_ids: Vec<usize> = b.iter().map(|l| intern(&mut ids, *l)).collect();

    let mut in_a = vec![false; ids.len()];
    let mut in_b = vec![false; ids.len()];
    a_ids.iter().for_each(|&id| in_a[id] = true);
    b_ids.iter().for_each(|&id| in_b[id] = true);

    let a_kept: Vec<usize> = (0..a.len()).filter(|&i| in_b[a_ids[i]]).collect();
    let b_kept: Vec<usize> = (0..b.len()).filter(|&j| in_a[b_ids[j]]).collect();
    let a_seq: Vec<usize> = a_kept.iter().map(|&i| a_ids[i]).collect();
    let b_seq: Vec<usize> = b_kept.iter().map(|&j| b_ids[j]).collect();

    let mut pairs = Vec::new();
    Search::new(&a_seq, &b_seq).conquer(0, a_seq.len(), 0, b_seq.len(), &mut pairs);

    pairs
        .into_iter()
        .map(|(i, j)| (a_kept[i], b_kept[j]))
        .collect()
}

fn intern<'a>(ids: &mut HashMap<&'a str, usize>, line: &'a str) -> usize {
    let next = ids.len();
    *ids.entry(line).or_insert(next)
}

/// Myers' divide-and-conquer search: find the middle snake of an optimal
/// path, then solve both halves. Memory is linear in the input length.
struct Search<'s> {
    a: &'s [usize],
    b: &'s [usize],
    // Furthest x per diagonal, forward from the start and backward from
    // the end of the current range.
    vf: Vec<isize>,
    vb: Vec<isize>,
    offset: isize,
}

impl<'s> Search<'s> {
    fn new(a: &'s [usize], b: &'s [usize]) -> Self {
        let d_max = (a.len() + b.len() + 1) / 2 + 1;
        let len = 2 * d_max + 3;
        Search {
            a,
            b,
            vf: vec![0; len],
            vb: vec![0; len],
            offset: d_max as isize + 1,
        }
    }

    fn slot(&self, k: isize) -> usize {
        (k + self.offset) as usize
    }

    /// Appends the matched pairs of `a[a_lo..a_hi]` and `b[b_lo..b_hi]`.
    fn conquer(
        &mut self,
        mut a_lo: usize,
        a_hi: usize,
        mut b_lo: usize,
        b_hi: usize,
        out: &mut Vec<(usize, usize)>,
    ) {
        while a_lo < a_hi && b_lo < b_hi && self.a[a_lo] == self.b[b_lo] {
            out.push((a_lo, b_lo));
            a_lo += 1;
            b_lo += 1;
        }

        let mut tail = 0;
        while a_hi - tail > a_lo
            && b_hi - tail > b_lo
            && self.a[a_hi - tail - 1] == self.b[b_hi - tail - 1]
        {
            tail += 1;
        }
        let (a_end, b_end) = (a_hi - tail, b_hi - tail);

        if a_lo < a_end && b_lo < b_end {
            match self.middle_snake(a_lo, a_end, b_lo, b_end) {
                Some((x, y)) if (x, y) != (a_lo, b_lo) && (x, y) != (a_end, b_end) => {
                    self.conquer(a_lo, x, b_lo, y, out);
                    self.conquer(x, a_end, y, b_end, out);
                }
                // No usable split: the whole region is reported as changed.
                _ => {}
            }
        }

        out.extend((0..tail).map(|t| (a_end + t, b_end + t)));
    }

    /// Returns a point on an optimal path through the range, taken from the
    /// forward search where it meets the backward one.
    fn middle_snake(
        &mut self,
        a_lo: usize,
        a_hi: usize,
        b_lo: usize,
        b_hi: usize,
    ) -> Option<(usize, usize)> {
        let n = (a_hi - a_lo) as isize;
        let m = (b_hi - b_lo) as isize;
        let delta = n - m;
        let odd = delta & 1 == 1;
        let d_max = (n + m + 1) / 2 + 1;

        let start = self.slot(1);
        self.vf[start] = 0;
        self.vb[start] = 0;

        for d in 0..d_max {
            let mut k = -d;
            while k <= d {
                let i = self.slot(k);
                let mut x = if k == -d || (k != d && self.vf[i - 1] < self.vf[i + 1]) {
                    self.vf[i + 1]
                } else {
                    self.vf[i - 1] + 1
                };
                let mut y = x - k;
                let (x0, y0) = (x, y);
                while x < n && y < m && self.a[a_lo + x as usize] == self.b[b_lo + y as usize] {
                    x += 1;
                    y += 1;
                }
                self.vf[i] = x;

                let kb = delta - k;
                if odd && kb.abs() <= d - 1 {
                    let xb = self.vb[self.slot(kb)];
                    if in_range(x, k, n, m) && in_range(xb, kb, n, m) && x + xb >= n {
                        return Some((a_lo + x0 as usize, b_lo + y0 as usize));
                    }
                }
                k += 2;
            }

            let mut k = -d;
            while k <= d {
                let i = self.slot(k);
                let mut x = if k == -d || (k != d && self.vb[i - 1] < self.vb[i + 1]) {
                    self.vb[i + 1]
                } else {
                    self.vb[i - 1] + 1
                };
                let mut y = x - k;
                while x < n
                    && y < m
                    && self.a[a_hi - 1 - x as usize] == self.b[b_hi - 1 - y as usize]
                {
                    x += 1;
                    y += 1;
                }
                self.vb[i] = x;

                let kf = delta - k;
                if !odd && kf.abs() <= d {
                    let xf = self.vf[self.slot(kf)];
                    if in_range(x, k, n, m) && in_range(xf, kf, n, m) && x + xf >= n {
                        return Some((a_lo + xf as usize, b_lo + (xf - kf) as usize));
                    }
                }
                k += 2;
            }
        }

        None
    }
}

/// Whether the point at `x` on diagonal `k` lies inside the edit graph.
fn in_range(x: isize, k: isize, n: isize, m: isize) -> bool {
    x <= n && x - k <= m
}

fn group(edits: &[Edit<'_>]) -> Vec<Hunk> {
    let mut hunks: Vec<Hunk> = Vec::new();

    for edit in edits {
        let (kind, line) = match *edit {
            Edit::Keep(l) => (HunkKind::Unchanged, l),
            Edit::Insert(l) => (HunkKind::Added, l),
            Edit::Delete(l) => (HunkKind::Removed, l),
        };
        match hunks.last_mut() {
            Some(last) if last.kind == kind => last.text.push_str(line),
            _ => hunks.push(Hunk::new(kind, line)),
        }
    }

    hunks
}
