//! Directional visit order for regions whose sites lie along a line.

/// A site eligible for a visit, positioned along the region's natural order.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceCandidate {
    pub id: String,
    pub position: usize,
    pub rating: f64,
}

/// Index of the best-rated candidate among `indices`; on equal ratings the
/// site nearer to `from` wins.
fn best(
    usable: &[&SequenceCandidate],
    indices: impl Iterator<Item = usize>,
    from: usize,
) -> Option<usize> {
    indices.fold(None, |best: Option<usize>, i| match best {
        Some(b)
            if usable[b].rating > usable[i].rating
                || (usable[b].rating == usable[i].rating
                    && usable[b].position.abs_diff(from) <= usable[i].position.abs_diff(from)) =>
        {
            Some(b)
        }
        _ => Some(i),
    })
}

/// Order up to `budget` visits, moving in one direction along the region.
///
/// Starts at the best-rated site (ties: lower position) and heads toward
/// the side holding more candidates (ties: forward). Each step takes the
/// best-rated unused site further along the current direction. When none
/// is left that way, the walk reverses only if the best remaining site is
/// rated at least `reverse_margin` above the current one.
pub fn sequence(candidates: &[SequenceCandidate], budget: usize, reverse_margin: f64) -> Vec<String> {
    let mut usable: Vec<&SequenceCandidate> = candidates.iter().filter(|c| c.rating > 0.0).collect();
    usable.sort_by_key(|c| c.position);
    if budget == 0 || usable.is_empty() {
        return Vec::new();
    }

    // Sorted by position, so the first maximum is the lowest position.
    let mut anchor = 0;
    for (i, c) in usable.iter().enumerate() {
        if c.rating > usable[anchor].rating {
            anchor = i;
        }
    }

    let ahead = usable.len() - anchor - 1;
    let behind = anchor;
    let mut forward = ahead >= behind;

    let mut used = vec![false; usable.len()];
    used[anchor] = true;
    let mut visits = vec![anchor];

    while visits.len() < budget {
        let tail = usable[visits[visits.len() - 1]];
        let unused = (0..usable.len()).filter(|&i| !used[i]);

        let onward = best(
            &usable,
            unused.clone().filter(|&i| {
                if forward {
                    usable[i].position > tail.position
                } else {
                    usable[i].position < tail.position
                }
            }),
            tail.position,
        );

        let next = match onward {
            Some(next) => next,
            None => match best(&usable, unused, tail.position) {
                Some(next) if usable[next].rating >= tail.rating + reverse_margin - 1e-9 => {
                    tracing::trace!(from = %tail.id, to = %usable[next].id, "Reversing direction");
                    forward = !forward;
                    next
                }
                _ => break,
            },
        };
        used[next] = true;
        visits.push(next);
    }

    visits.into_iter().map(|i| usable[i].id.clone()).collect()
}
