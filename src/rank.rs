/// Sender ranking.
///
/// Counts are kept in an insertion-ordered map so that equal counts keep the
/// order in which senders first appeared in the export.
use indexmap::IndexMap;

use crate::export::{MessageRecord, SenderId, SenderIdentity};
use crate::stats::SenderCount;

/// Number of senders kept per ranking.
pub const TOP_SENDERS: usize = 3;

type SenderKey<'a> = (&'a SenderId, Option<&'a str>);

/// Messages per sender identity, in first-seen order.
pub fn tally_senders<'a, I>(messages: I) -> IndexMap<SenderKey<'a>, usize>
where
    I: IntoIterator<Item = &'a MessageRecord>,
{
    let mut tally: IndexMap<SenderKey<'a>, usize> = IndexMap::new();
    for msg in messages {
        *tally.entry((&msg.from_id, msg.from.as_deref())).or_insert(0) += 1;
    }
    tally
}

/// Ranks senders by message count, highest first, keeping at most `limit`.
pub fn top_senders<'a, I>(messages: I, limit: usize) -> Vec<SenderCount>
where
    I: IntoIterator<Item = &'a MessageRecord>,
{
    let mut ranked: Vec<(SenderKey<'a>, usize)> = tally_senders(messages).into_iter().collect();
    // Stable: ties stay in first-seen order.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    ranked
        .into_iter()
        .take(limit)
        .map(|((from_id, from), messages)| SenderCount {
            sender: SenderIdentity {
                from_id: from_id.clone(),
                from: from.map(str::to_string),
            },
            messages,
        })
        .collect()
}

pub fn distinct_senders<'a, I>(messages: I) -> usize
where
    I: IntoIterator<Item = &'a MessageRecord>,
{
    tally_senders(messages).len()
}
