//! Claim catalog locks and the claim-result banner.
//!
//! The catalog holds one entry per [`ClaimKind`]. An entry becomes won when
//! the server reports a successful claim for it and stays won forever; the
//! first winner recorded is the only winner.
//!
//! The banner is a single slot. Showing a banner replaces whatever was there,
//! so a pending expiry for an older banner can never clear a newer one: expiry
//! and dismissal are both checked against the banner currently in the slot.

use std::{fmt, time::Duration};

use tambola_proto::ClaimKind;

/// Catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimEntry {
    /// Pattern.
    pub kind: ClaimKind,
    /// First successful claimant. `None` while unclaimed.
    pub winner: Option<String>,
}

impl ClaimEntry {
    /// Whether the pattern has been won.
    pub fn is_won(&self) -> bool {
        self.winner.is_some()
    }
}

/// The six claimable patterns and their lock state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimCatalog {
    entries: Vec<ClaimEntry>,
}

impl Default for ClaimCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimCatalog {
    /// Catalog with every pattern unclaimed.
    pub fn new() -> Self {
        let entries =
            ClaimKind::ALL.into_iter().map(|kind| ClaimEntry { kind, winner: None }).collect();
        Self { entries }
    }

    /// Entries in display order.
    pub fn entries(&self) -> &[ClaimEntry] {
        &self.entries
    }

    /// Whether `kind` has been won.
    pub fn is_won(&self, kind: ClaimKind) -> bool {
        self.winner(kind).is_some()
    }

    /// Winner of `kind`, if any.
    pub fn winner(&self, kind: ClaimKind) -> Option<&str> {
        self.entries.iter().find(|e| e.kind == kind).and_then(|e| e.winner.as_deref())
    }

    /// Lock `kind` for `winner`. Returns `false` if it was already won.
    pub fn lock(&mut self, kind: ClaimKind, winner: &str) -> bool {
        match self.entries.iter_mut().find(|e| e.kind == kind) {
            Some(entry) if entry.winner.is_none() => {
                entry.winner = Some(winner.to_string());
                true
            },
            _ => false,
        }
    }
}

/// Identity of one banner display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BannerId(pub u64);

impl fmt::Display for BannerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "banner#{}", self.0)
    }
}

/// What the banner announces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BannerOutcome {
    /// Someone won the claim.
    Success {
        /// Winner's display name.
        winner: String,
    },
    /// The claim did not hold.
    Invalid,
    /// The claim had already been won.
    Already,
}

/// A claim-result banner on display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimBanner<I> {
    /// Display identity.
    pub id: BannerId,
    /// Pattern the result is about, when known.
    pub claim: Option<ClaimKind>,
    /// Result.
    pub outcome: BannerOutcome,
    /// When the banner appeared.
    pub shown_at: I,
    /// How long it stays up.
    pub lifetime: Duration,
}

impl<I> ClaimBanner<I>
where
    I: Copy + std::ops::Sub<Output = Duration>,
{
    /// Whether the banner's lifetime has run out at `now`.
    pub fn is_expired(&self, now: I) -> bool {
        now - self.shown_at >= self.lifetime
    }

    /// Display text.
    pub fn text(&self) -> String {
        match (&self.outcome, self.claim) {
            (BannerOutcome::Success { winner }, Some(claim)) => {
                format!("{} WON by {winner}", claim.code())
            },
            (BannerOutcome::Success { winner }, None) => format!("WON by {winner}"),
            (BannerOutcome::Invalid, _) => "Invalid Claim".to_string(),
            (BannerOutcome::Already, _) => "Already Claimed".to_string(),
        }
    }
}

/// Claim state: catalog locks plus the banner slot.
#[derive(Debug, Clone)]
pub struct ClaimState<I> {
    catalog: ClaimCatalog,
    banner: Option<ClaimBanner<I>>,
    next_banner: u64,
    banner_lifetime: Duration,
}

impl<I> ClaimState<I>
where
    I: Copy + std::ops::Sub<Output = Duration>,
{
    /// Fresh state with banners living for `banner_lifetime`.
    pub fn new(banner_lifetime: Duration) -> Self {
        Self { catalog: ClaimCatalog::new(), banner: None, next_banner: 1, banner_lifetime }
    }

    /// Catalog locks.
    pub fn catalog(&self) -> &ClaimCatalog {
        &self.catalog
    }

    /// Banner on display, if any.
    pub fn banner(&self) -> Option<&ClaimBanner<I>> {
        self.banner.as_ref()
    }

    /// Whether a new claim for `kind` may be submitted.
    pub fn can_submit(&self, kind: ClaimKind) -> bool {
        !self.catalog.is_won(kind)
    }

    /// Record a successful claim and announce it.
    ///
    /// Returns `None` without touching anything if `kind` was already won.
    pub fn record_win(&mut self, kind: ClaimKind, winner: &str, now: I) -> Option<BannerId> {
        if !self.catalog.lock(kind, winner) {
            return None;
        }
        let outcome = BannerOutcome::Success { winner: winner.to_string() };
        Some(self.show(Some(kind), outcome, now))
    }

    /// Announce a rejected claim. The catalog is left untouched.
    pub fn record_rejection(
        &mut self,
        kind: Option<ClaimKind>,
        outcome: BannerOutcome,
        now: I,
    ) -> BannerId {
        self.show(kind, outcome, now)
    }

    /// Clear the banner if its lifetime has run out.
    pub fn expire_banner(&mut self, now: I) -> Option<BannerId> {
        match &self.banner {
            Some(banner) if banner.is_expired(now) => self.banner.take().map(|b| b.id),
            _ => None,
        }
    }

    /// Clear the banner only if `id` is the one on display.
    pub fn dismiss_banner(&mut self, id: BannerId) -> bool {
        if self.banner.as_ref().is_some_and(|b| b.id == id) {
            self.banner = None;
            return true;
        }
        false
    }

    fn show(&mut self, claim: Option<ClaimKind>, outcome: BannerOutcome, now: I) -> BannerId {
        let id = BannerId(self.next_banner);
        self.next_banner += 1;
        self.banner =
            Some(ClaimBanner { id, claim, outcome, shown_at: now, lifetime: self.banner_lifetime });
        id
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    const LIFETIME: Duration = Duration::from_millis(2500);

    #[test]
    fn first_winner_is_final() {
        let now = Instant::now();
        let mut claims = ClaimState::new(LIFETIME);

        assert!(claims.record_win(ClaimKind::FirstLine, "Bob", now).is_some());
        assert!(claims.record_win(ClaimKind::FirstLine, "Eve", now).is_none());

        assert_eq!(claims.catalog().winner(ClaimKind::FirstLine), Some("Bob"));
        assert!(!claims.can_submit(ClaimKind::FirstLine));
        assert!(claims.can_submit(ClaimKind::Tambola));
    }

    #[test]
    fn success_banner_text() {
        let now = Instant::now();
        let mut claims = ClaimState::new(LIFETIME);
        claims.record_win(ClaimKind::FirstLine, "Bob", now);

        let text = claims.banner().map(ClaimBanner::text);
        assert_eq!(text.as_deref(), Some("FIRST_LINE WON by Bob"));
    }

    #[test]
    fn newer_banner_survives_older_expiry() {
        let start = Instant::now();
        let mut claims = ClaimState::new(LIFETIME);

        let first = claims.record_rejection(None, BannerOutcome::Invalid, start);
        let later = start + Duration::from_millis(2000);
        let second =
            claims.record_rejection(Some(ClaimKind::Quick5), BannerOutcome::Already, later);

        // The first banner's deadline passes but the slot holds the second
        assert_eq!(claims.expire_banner(start + LIFETIME), None);
        assert!(!claims.dismiss_banner(first));
        assert_eq!(claims.banner().map(|b| b.id), Some(second));

        assert_eq!(claims.expire_banner(later + LIFETIME), Some(second));
        assert!(claims.banner().is_none());
    }

    #[test]
    fn rejections_leave_catalog_alone() {
        let now = Instant::now();
        let mut claims = ClaimState::new(LIFETIME);
        claims.record_rejection(Some(ClaimKind::Tambola), BannerOutcome::Invalid, now);

        assert!(claims.catalog().entries().iter().all(|e| !e.is_won()));
    }
}
