//! Reply-chain resolution within one merge pass.
//!
//! A reply may precede the annotation it answers. Names move from
//! unregistered to registered exactly once; a reply whose target is not yet
//! registered waits in a pending bucket keyed by the target name until that
//! name registers.

use std::collections::HashMap;

use super::record::RecordId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyState {
    Unregistered,
    Registered(RecordId),
    Pending(usize),
}

/// A reply waiting for `target` that never registered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReply {
    pub target: String,
    pub reply: RecordId,
}

#[derive(Debug, Default)]
pub struct ReplyResolver {
    registered: HashMap<String, RecordId>,
    pending: HashMap<String, Vec<RecordId>>,
    linked: usize,
}

impl ReplyResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` and returns the replies that were waiting for it,
    /// paired with the record they now point at. A later registration of the
    /// same name replaces the earlier one for future lookups.
    pub fn register(&mut self, name: &str, record: RecordId) -> Vec<(RecordId, RecordId)> {
        self.registered.insert(name.to_string(), record);
        let waiting = self.pending.remove(name).unwrap_or_default();
        self.linked += waiting.len();
        waiting.into_iter().map(|reply| (reply, record)).collect()
    }

    /// Looks up `target` for `reply`. Returns the target right away when it is
    /// registered, otherwise queues the reply.
    pub fn request(&mut self, reply: RecordId, target: &str) -> Option<RecordId> {
        match self.registered.get(target) {
            Some(found) => {
                self.linked += 1;
                Some(*found)
            }
            None => {
                self.pending.entry(target.to_string()).or_default().push(reply);
                None
            }
        }
    }

    pub fn state(&self, name: &str) -> ReplyState {
        if let Some(record) = self.registered.get(name) {
            return ReplyState::Registered(*record);
        }
        match self.pending.get(name) {
            Some(waiting) if !waiting.is_empty() => ReplyState::Pending(waiting.len()),
            _ => ReplyState::Unregistered,
        }
    }

    pub fn linked(&self) -> usize {
        self.linked
    }

    /// Ends the pass, returning every reply whose target never appeared,
    /// ordered by reply record.
    pub fn finish(self) -> Vec<UnresolvedReply> {
        let mut unresolved: Vec<UnresolvedReply> = self
            .pending
            .into_iter()
            .flat_map(|(target, replies)| {
                replies.into_iter().map(move |reply| UnresolvedReply {
                    target: target.clone(),
                    reply,
                })
            })
            .collect();
        unresolved.sort_by_key(|u| u.reply);
        unresolved
    }
}
