//! Small arithmetic and grouping helpers shared by the index and update
//! modules: `⌈·⌉` division, and the two grouping schemes §4.6/§4.6a name
//! for turning a flat list of nodes or records into correctly sized
//! siblings.

pub fn ceil_div(n: usize, d: usize) -> usize {
    (n + d - 1) / d
}

/// Split `items` into the fewest groups of size `<= max` such that every
/// group also has size `>= ceil(max/2)`, the sizes as equal as possible
/// (§4.6 step 5: "partition the children into groups ... approximately
/// equal, maximizing fullness").
pub fn group_into_valid_sizes<T>(items: Vec<T>, max: usize) -> Vec<Vec<T>> {
    let n = items.len();
    if n == 0 {
        return Vec::new();
    }
    let num_groups = ceil_div(n, max).max(1);
    let base = n / num_groups;
    let extra = n % num_groups;

    let mut groups = Vec::with_capacity(num_groups);
    let mut rest = items.into_iter();
    for i in 0..num_groups {
        let size = base + if i < extra { 1 } else { 0 };
        groups.push(rest.by_ref().take(size).collect());
    }
    groups
}

/// The 150%/75% streaming-split scheme (§4.6a step 4): buffer entries
/// until `1.5 * limit` accumulate, cut off `0.75 * limit` as a group, and
/// repeat; whatever cannot be cut without stranding an under-full tail is
/// handed to the balanced grouping above instead, so every group this
/// function returns satisfies `[ceil(limit/2), limit]`.
pub fn stream_split<T>(items: Vec<T>, limit: usize) -> Vec<Vec<T>> {
    let high = limit + limit / 2;
    let cut = ceil_div(limit * 3, 4);
    let half = ceil_div(limit, 2);

    let mut groups = Vec::new();
    let mut rest = items;
    while rest.len() >= high {
        if rest.len() - cut < half {
            break;
        }
        let tail = rest.split_off(cut);
        groups.push(rest);
        rest = tail;
    }

    if rest.len() > limit {
        groups.extend(group_into_valid_sizes(rest, limit));
    } else if !rest.is_empty() {
        groups.push(rest);
    }
    groups
}

#[cfg(test)]
#[path = "util_test.rs"]
mod util_test;
