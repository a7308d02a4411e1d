/// Record classification.
///
/// Splits the raw export records into messages, link joins and invites,
/// keeping document order in each partition.
use tracing::debug;

use crate::export::{
    MessageRecord, RawRecord, ServiceRecord, ACTION_INVITE_MEMBERS, ACTION_JOIN_BY_LINK,
};

#[derive(Debug, Default)]
pub struct Classified<'a> {
    pub messages: Vec<&'a MessageRecord>,
    pub link_joins: Vec<&'a ServiceRecord>,
    pub invites: Vec<&'a ServiceRecord>,
    /// Records of another type, or service records with an unrecognized action.
    pub dropped: usize,
}

impl Classified<'_> {
    pub fn total(&self) -> usize {
        self.messages.len() + self.link_joins.len() + self.invites.len()
    }
}

pub fn classify(records: &[RawRecord]) -> Classified<'_> {
    let mut classified = Classified::default();

    for record in records {
        match record {
            RawRecord::Message(msg) => classified.messages.push(msg),
            RawRecord::Service(svc) => match svc.action.as_deref() {
                Some(ACTION_JOIN_BY_LINK) => classified.link_joins.push(svc),
                Some(ACTION_INVITE_MEMBERS) => classified.invites.push(svc),
                _ => classified.dropped += 1,
            },
            RawRecord::Other => classified.dropped += 1,
        }
    }

    debug!(
        messages = classified.messages.len(),
        link_joins = classified.link_joins.len(),
        invites = classified.invites.len(),
        dropped = classified.dropped,
        "Classified export records"
    );

    classified
}
