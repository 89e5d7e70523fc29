//! Per-call-site debounce.
//!
//! Each call at a site takes a ticket and waits out the quiet period. A newer
//! ticket at the same site replaces the older one, so when the window closes
//! only the last ticket is still current and only its call runs. Superseded
//! calls resolve to `None` instead of a result. Calls from different sites
//! never coalesce, even when method and params are identical.

use dashmap::DashMap;
use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::panic::Location;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Identity of a debounce slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CallSite {
    /// Source location of the call.
    Location(&'static Location<'static>),
    /// Caller-chosen name, for sites that span several source locations.
    Named(Cow<'static, str>),
}

impl CallSite {
    #[track_caller]
    pub fn here() -> Self {
        CallSite::Location(Location::caller())
    }

    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        CallSite::Named(name.into())
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallSite::Location(loc) => write!(f, "{}:{}:{}", loc.file(), loc.line(), loc.column()),
            CallSite::Named(name) => f.write_str(name),
        }
    }
}

type Slots = Arc<DashMap<CallSite, u64>>;

/// Pending claim on a call site. Dropping it releases the slot if no newer
/// ticket replaced it.
#[derive(Debug)]
pub struct Ticket {
    site: CallSite,
    generation: u64,
    slots: Slots,
}

impl Ticket {
    pub fn site(&self) -> &CallSite {
        &self.site
    }

    fn is_current(&self) -> bool {
        self.slots
            .get(&self.site)
            .map(|g| *g == self.generation)
            .unwrap_or(false)
    }
}

impl Drop for Ticket {
    fn drop(&mut self) {
        let generation = self.generation;
        self.slots.remove_if(&self.site, |_, g| *g == generation);
    }
}

#[derive(Clone, Default)]
pub struct DebounceGate {
    slots: Slots,
    generations: Arc<AtomicU64>,
}

impl DebounceGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `site`, superseding whatever ticket held it.
    pub fn schedule(&self, site: CallSite) -> Ticket {
        let generation = self.generations.fetch_add(1, Ordering::Relaxed) + 1;
        self.slots.insert(site.clone(), generation);
        Ticket { site, generation, slots: self.slots.clone() }
    }

    /// Wait `delay`; true if `ticket` is still the latest at its site.
    pub async fn settle(&self, ticket: Ticket, delay: Duration) -> bool {
        tokio::time::sleep(delay).await;
        ticket.is_current()
    }

    /// Debounce `fut` at `site`. `None` means a later call took over.
    pub async fn run<F, T>(&self, site: CallSite, delay: Duration, fut: F) -> Option<T>
    where
        F: Future<Output = T>,
    {
        let ticket = self.schedule(site);
        if self.settle(ticket, delay).await {
            Some(fut.await)
        } else {
            None
        }
    }

    /// Number of sites with a call still waiting.
    pub fn pending(&self) -> usize {
        self.slots.len()
    }
}
