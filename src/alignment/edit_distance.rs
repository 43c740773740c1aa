use crate::types::AlignmentPosition;

const MATCH_COST: u32 = 0;
const EDIT_COST: u32 = 1;

/// Cost of aligning a pair of suffixes: total edits first, then how many of
/// those are insertions or deletions. Tuple order makes the derived `Ord`
/// prefer the fewest edits, then the most diagonal moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Cost {
    edits: u32,
    indels: u32,
}

impl Cost {
    const ZERO: Self = Self { edits: 0, indels: 0 };

    #[inline(always)]
    fn diagonal(self, step: u32) -> Self {
        Self {
            edits: self.edits + step,
            indels: self.indels,
        }
    }

    #[inline(always)]
    fn indel(self) -> Self {
        Self {
            edits: self.edits + EDIT_COST,
            indels: self.indels + 1,
        }
    }
}

/// Token-level Levenshtein alignment of `observed` against `reference`.
///
/// Among minimum-edit paths the one with the most match/substitution moves
/// wins; remaining ties go to the path that is lexicographically earliest
/// when read from the start, with moves ordered diagonal, delete (missing),
/// insert (extra). Identical inputs always produce the same path.
///
/// Unbounded: callers enforce the token limit.
pub(crate) fn align_edit_distance(
    reference: &[String],
    observed: &[String],
) -> Vec<AlignmentPosition> {
    let r_len = reference.len();
    let o_len = observed.len();
    if r_len == 0 {
        return observed.iter().map(AlignmentPosition::extra).collect();
    }
    if o_len == 0 {
        return reference.iter().map(AlignmentPosition::missing).collect();
    }

    let width = o_len + 1;
    let cost = fill_suffix_table(reference, observed);

    let mut path = Vec::with_capacity(r_len + o_len);
    let (mut i, mut j) = (0usize, 0usize);
    while i < r_len || j < o_len {
        let here = cost[i * width + j];
        if i < r_len && j < o_len {
            let step = substitution_cost(&reference[i], &observed[j]);
            if here == cost[(i + 1) * width + (j + 1)].diagonal(step) {
                path.push(AlignmentPosition::paired(
                    reference[i].as_str(),
                    observed[j].as_str(),
                ));
                i += 1;
                j += 1;
                continue;
            }
        }
        if i < r_len && here == cost[(i + 1) * width + j].indel() {
            path.push(AlignmentPosition::missing(reference[i].as_str()));
            i += 1;
            continue;
        }
        debug_assert!(j < o_len, "forward walk left the cost table");
        path.push(AlignmentPosition::extra(observed[j].as_str()));
        j += 1;
    }
    path
}

/// Row-major `(len(reference) + 1) x (len(observed) + 1)` table where cell
/// `(i, j)` holds the best cost of aligning `reference[i..]` with
/// `observed[j..]`.
fn fill_suffix_table(reference: &[String], observed: &[String]) -> Vec<Cost> {
    let r_len = reference.len();
    let o_len = observed.len();
    let width = o_len + 1;
    let mut cost = vec![Cost::ZERO; (r_len + 1) * width];

    for j in (0..o_len).rev() {
        cost[r_len * width + j] = cost[r_len * width + j + 1].indel();
    }
    for i in (0..r_len).rev() {
        let row = i * width;
        let next_row = (i + 1) * width;
        cost[row + o_len] = cost[next_row + o_len].indel();
        for j in (0..o_len).rev() {
            let diagonal =
                cost[next_row + j + 1].diagonal(substitution_cost(&reference[i], &observed[j]));
            let delete = cost[next_row + j].indel();
            let insert = cost[row + j + 1].indel();
            cost[row + j] = diagonal.min(delete).min(insert);
        }
    }
    cost
}

#[inline(always)]
fn substitution_cost(reference: &str, observed: &str) -> u32 {
    if reference == observed {
        MATCH_COST
    } else {
        EDIT_COST
    }
}
