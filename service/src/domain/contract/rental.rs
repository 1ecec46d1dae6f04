//! [`Rental`] contract definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, Date, DateTimeOf, Money};
use derive_more::{Display, Error, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};

#[cfg(doc)]
use crate::domain::{Customer, Equipment};
use crate::domain::{customer, equipment};

use super::{Id, Version};

/// Contract about a [`Customer`] renting an [`Equipment`] for a [`Period`].
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Rental {
    /// ID of this [`Rental`].
    pub id: Id,

    /// ID of the rented [`Equipment`].
    pub equipment_id: equipment::Id,

    /// ID of the renting [`Customer`].
    pub customer_id: customer::Id,

    /// [`Period`] the [`Equipment`] is rented for.
    pub period: Period,

    /// Number of [`Shifts`] the [`Equipment`] is rented for.
    pub shifts: Shifts,

    /// Price of a single shift.
    pub shift_price: Money,

    /// [`Status`] of this [`Rental`].
    pub status: Status,

    /// [`DateTime`] when this [`Rental`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Rental`] was deleted, if it was.
    pub deleted_at: Option<DeletionDateTime>,

    /// Row [`Version`] of this [`Rental`].
    pub version: Version,
}

impl Rental {
    /// Returns total price of this [`Rental`] for all its [`Shifts`].
    ///
    /// [`None`] if it doesn't fit into [`Money`].
    #[must_use]
    pub fn total_price(&self) -> Option<Money> {
        self.shift_price.checked_mul(self.shifts.get())
    }

    /// Indicates whether this [`Rental`] is soft-deleted.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Applies the provided [`Transition`] to the [`Status`] of this
    /// [`Rental`].
    ///
    /// # Errors
    ///
    /// If the [`Transition`] is not allowed from the current [`Status`]. This
    /// [`Rental`] is left untouched then.
    pub fn apply(
        &mut self,
        transition: Transition,
    ) -> Result<Status, InvalidTransition> {
        let next = self.status.apply(transition).ok_or(InvalidTransition {
            from: self.status,
            transition,
        })?;
        self.status = next;
        Ok(next)
    }

    /// Activates this [`Rental`].
    ///
    /// # Errors
    ///
    /// If this [`Rental`] is not a [`Status::Draft`].
    pub fn activate(&mut self) -> Result<Status, InvalidTransition> {
        self.apply(Transition::Activate)
    }

    /// Suspends this [`Rental`].
    ///
    /// # Errors
    ///
    /// If this [`Rental`] is not [`Status::Active`].
    pub fn suspend(&mut self) -> Result<Status, InvalidTransition> {
        self.apply(Transition::Suspend)
    }

    /// Resumes this suspended [`Rental`].
    ///
    /// # Errors
    ///
    /// If this [`Rental`] is not [`Status::Suspended`].
    pub fn resume(&mut self) -> Result<Status, InvalidTransition> {
        self.apply(Transition::Resume)
    }

    /// Finishes this [`Rental`].
    ///
    /// # Errors
    ///
    /// If this [`Rental`] is not [`Status::Active`].
    pub fn finish(&mut self) -> Result<Status, InvalidTransition> {
        self.apply(Transition::Finish)
    }

    /// Cancels this [`Rental`].
    ///
    /// # Errors
    ///
    /// If this [`Rental`] is already finished or cancelled.
    pub fn cancel(&mut self) -> Result<Status, InvalidTransition> {
        self.apply(Transition::Cancel)
    }
}

/// Inclusive range of [`Date`]s a [`Rental`] covers.
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize,
)]
pub struct Period {
    /// First day of this [`Period`].
    start: Date,

    /// Last day of this [`Period`].
    end: Date,
}

impl Period {
    /// Creates a new [`Period`] if `end` doesn't precede `start`.
    #[must_use]
    pub fn new(start: Date, end: Date) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Creates a new [`Period`] without checking its dates order.
    ///
    /// # Safety
    ///
    /// The caller must ensure that `end` doesn't precede `start`.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(start: Date, end: Date) -> Self {
        Self { start, end }
    }

    /// Returns the first day of this [`Period`].
    #[must_use]
    pub fn start(&self) -> Date {
        self.start
    }

    /// Returns the last day of this [`Period`].
    #[must_use]
    pub fn end(&self) -> Date {
        self.end
    }

    /// Indicates whether this [`Period`] shares at least one day with the
    /// `other` one.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Indicates whether this [`Period`] is entirely before the given
    /// `date`.
    #[must_use]
    pub fn has_ended_by(&self, date: Date) -> bool {
        self.end < date
    }

    /// Returns number of days in this [`Period`].
    #[must_use]
    pub fn days(&self) -> i64 {
        self.start.days_until(self.end) + 1
    }
}

/// Positive number of shifts in a [`Rental`].
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(try_from = "i32", into = "i32")]
pub struct Shifts(u16);

impl Shifts {
    /// Creates new [`Shifts`] if the given `count` is positive.
    #[must_use]
    pub fn new(count: i32) -> Option<Self> {
        u16::try_from(count).ok().filter(|c| *c > 0).map(Self)
    }

    /// Returns the number of shifts.
    #[must_use]
    pub fn get(self) -> u16 {
        self.0
    }
}

impl TryFrom<i32> for Shifts {
    type Error = &'static str;

    fn try_from(count: i32) -> Result<Self, Self::Error> {
        Self::new(count).ok_or("invalid `Shifts`")
    }
}

impl From<Shifts> for i32 {
    fn from(shifts: Shifts) -> Self {
        Self::from(shifts.0)
    }
}

#[cfg(feature = "postgres")]
impl<'a> FromSql<'a> for Shifts {
    postgres_types::accepts!(INT4);

    fn from_sql(
        ty: &postgres_types::Type,
        raw: &'a [u8],
    ) -> Result<Self, Box<dyn std::error::Error + Sync + Send>> {
        Ok(Self::try_from(i32::from_sql(ty, raw)?)?)
    }
}

#[cfg(feature = "postgres")]
impl ToSql for Shifts {
    postgres_types::accepts!(INT4);
    postgres_types::to_sql_checked!();

    fn to_sql(
        &self,
        ty: &postgres_types::Type,
        w: &mut postgres_types::private::BytesMut,
    ) -> Result<postgres_types::IsNull, Box<dyn std::error::Error + Sync + Send>>
    {
        i32::from(*self).to_sql(ty, w)
    }
}

define_kind! {
    #[doc = "Lifecycle status of a [`Rental`]."]
    enum Status {
        #[doc = "Prepared, but not yet in effect."]
        Draft = 1,

        #[doc = "In effect, the [`Equipment`] is with the [`Customer`]."]
        Active = 2,

        #[doc = "Temporarily paused, the [`Equipment`] stays reserved."]
        Suspended = 3,

        #[doc = "Completed as agreed."]
        Finished = 4,

        #[doc = "Aborted before completion."]
        Cancelled = 5,
    }
}

impl Status {
    /// [`Status`]es of a [`Rental`] which still may claim its [`Equipment`].
    pub const OPEN: [Self; 3] = [Self::Draft, Self::Active, Self::Suspended];

    /// Returns the [`Status`] reached by applying the provided [`Transition`]
    /// to this one, if it's allowed.
    #[must_use]
    pub const fn apply(self, transition: Transition) -> Option<Self> {
        use Status as S;
        use Transition as T;

        Some(match (self, transition) {
            (S::Draft, T::Activate) | (S::Suspended, T::Resume) => S::Active,
            (S::Active, T::Suspend) => S::Suspended,
            (S::Active, T::Finish) => S::Finished,
            (S::Draft | S::Active | S::Suspended, T::Cancel) => S::Cancelled,
            (
                S::Draft | S::Active | S::Suspended | S::Finished | S::Cancelled,
                T::Activate | T::Suspend | T::Resume | T::Finish | T::Cancel,
            ) => return None,
        })
    }

    /// Indicates whether a [`Rental`] in this [`Status`] still may claim its
    /// [`Equipment`].
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Draft | Self::Active | Self::Suspended)
    }

    /// Indicates whether a [`Rental`] in this [`Status`] holds its
    /// [`Equipment`].
    #[must_use]
    pub const fn holds_equipment(self) -> bool {
        matches!(self, Self::Active | Self::Suspended)
    }

    /// Returns [`equipment::Status`] mirroring a [`Rental`] in this
    /// [`Status`].
    #[must_use]
    pub const fn equipment_status(self) -> equipment::Status {
        if self.holds_equipment() {
            equipment::Status::Rented
        } else {
            equipment::Status::Available
        }
    }
}

define_kind! {
    #[doc = "Requested change of a [`Rental`] [`Status`]."]
    enum Transition {
        #[doc = "[`Status::Draft`] to [`Status::Active`]."]
        Activate = 1,

        #[doc = "[`Status::Active`] to [`Status::Suspended`]."]
        Suspend = 2,

        #[doc = "[`Status::Suspended`] to [`Status::Active`]."]
        Resume = 3,

        #[doc = "[`Status::Active`] to [`Status::Finished`]."]
        Finish = 4,

        #[doc = "Any open [`Status`] to [`Status::Cancelled`]."]
        Cancel = 5,
    }
}

/// Error of applying a [`Transition`] not allowed from the current
/// [`Status`].
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("cannot {transition:?} a `{from}` rental contract")]
pub struct InvalidTransition {
    /// [`Status`] the [`Transition`] was requested from.
    pub from: Status,

    /// Rejected [`Transition`].
    pub transition: Transition,
}

/// [`DateTime`] when a [`Rental`] was created.
pub type CreationDateTime = DateTimeOf<(Rental, unit::Creation)>;

/// [`DateTime`] when a [`Rental`] was deleted.
pub type DeletionDateTime = DateTimeOf<(Rental, unit::Deletion)>;

#[cfg(test)]
mod spec {
    use common::{money::Currency, Date, DateTime, Money};

    use crate::domain::{contract, customer, equipment};

    use super::{
        InvalidTransition, Period, Rental, Shifts, Status, Transition,
    };

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    fn period(start: &str, end: &str) -> Period {
        Period::new(date(start), date(end)).unwrap()
    }

    fn rental(status: Status) -> Rental {
        Rental {
            id: contract::Id::new(),
            equipment_id: equipment::Id::new(),
            customer_id: customer::Id::new(),
            period: period("2030-05-01", "2030-05-10"),
            shifts: Shifts::new(4).unwrap(),
            shift_price: "150.25USD".parse().unwrap(),
            status,
            created_at: DateTime::now().coerce(),
            deleted_at: None,
            version: contract::Version::INITIAL,
        }
    }

    #[test]
    fn allowed_transitions() {
        use Status as S;
        use Transition as T;

        for (from, transition, to) in [
            (S::Draft, T::Activate, S::Active),
            (S::Draft, T::Cancel, S::Cancelled),
            (S::Active, T::Suspend, S::Suspended),
            (S::Active, T::Finish, S::Finished),
            (S::Active, T::Cancel, S::Cancelled),
            (S::Suspended, T::Resume, S::Active),
            (S::Suspended, T::Cancel, S::Cancelled),
        ] {
            assert_eq!(from.apply(transition), Some(to), "{from} {transition}");
        }
    }

    #[test]
    fn rejected_transitions() {
        use Status as S;
        use Transition as T;

        for (from, transition) in [
            (S::Draft, T::Suspend),
            (S::Draft, T::Resume),
            (S::Draft, T::Finish),
            (S::Active, T::Activate),
            (S::Active, T::Resume),
            (S::Suspended, T::Suspend),
            (S::Suspended, T::Finish),
            (S::Suspended, T::Activate),
        ] {
            assert_eq!(from.apply(transition), None, "{from} {transition}");
        }
    }

    #[test]
    fn terminal_statuses_reject_everything() {
        use Transition as T;

        for from in [Status::Finished, Status::Cancelled] {
            for transition in
                [T::Activate, T::Suspend, T::Resume, T::Finish, T::Cancel]
            {
                assert_eq!(from.apply(transition), None);
            }
        }
    }

    #[test]
    fn rental_keeps_status_on_rejected_transition() {
        let mut r = rental(Status::Finished);

        let err = r.cancel().unwrap_err();

        assert!(matches!(
            err,
            InvalidTransition {
                from: Status::Finished,
                transition: Transition::Cancel,
            },
        ));
        assert_eq!(r.status, Status::Finished);
    }

    #[test]
    fn rental_walks_lifecycle() {
        let mut r = rental(Status::Draft);

        assert_eq!(r.activate().unwrap(), Status::Active);
        assert_eq!(r.suspend().unwrap(), Status::Suspended);
        assert_eq!(r.resume().unwrap(), Status::Active);
        assert_eq!(r.finish().unwrap(), Status::Finished);
        assert!(r.activate().is_err());
    }

    #[test]
    fn equipment_mirrors_status() {
        use equipment::Status as E;

        assert_eq!(Status::Draft.equipment_status(), E::Available);
        assert_eq!(Status::Active.equipment_status(), E::Rented);
        assert_eq!(Status::Suspended.equipment_status(), E::Rented);
        assert_eq!(Status::Finished.equipment_status(), E::Available);
        assert_eq!(Status::Cancelled.equipment_status(), E::Available);
    }

    #[test]
    fn open_statuses() {
        for s in Status::OPEN {
            assert!(s.is_open());
        }
        assert!(!Status::Finished.is_open());
        assert!(!Status::Cancelled.is_open());
    }

    #[test]
    fn period_requires_ordered_dates() {
        assert!(Period::new(date("2030-01-02"), date("2030-01-01")).is_none());
        assert_eq!(period("2030-01-01", "2030-01-01").days(), 1);
        assert_eq!(period("2030-01-30", "2030-02-02").days(), 4);
    }

    #[test]
    fn period_overlap_is_inclusive() {
        let base = period("2030-05-10", "2030-05-20");

        assert!(base.overlaps(&period("2030-05-20", "2030-05-25")));
        assert!(base.overlaps(&period("2030-05-01", "2030-05-10")));
        assert!(base.overlaps(&period("2030-05-12", "2030-05-13")));
        assert!(base.overlaps(&period("2030-05-01", "2030-05-31")));
        assert!(!base.overlaps(&period("2030-05-21", "2030-05-25")));
        assert!(!base.overlaps(&period("2030-05-01", "2030-05-09")));
    }

    #[test]
    fn period_end() {
        let p = period("2030-05-10", "2030-05-20");

        assert!(!p.has_ended_by(date("2030-05-20")));
        assert!(p.has_ended_by(date("2030-05-21")));
    }

    #[test]
    fn shifts_must_be_positive() {
        assert_eq!(Shifts::new(3).map(Shifts::get), Some(3));
        assert!(Shifts::new(0).is_none());
        assert!(Shifts::new(-2).is_none());
        assert!(Shifts::new(i32::from(u16::MAX) + 1).is_none());
    }

    #[test]
    fn total_price() {
        let r = rental(Status::Draft);

        assert_eq!(
            r.total_price(),
            Some(Money {
                amount: "601.00".parse().unwrap(),
                currency: Currency::Usd,
            }),
        );
    }

    #[test]
    fn total_price_overflow() {
        let r = Rental {
            shift_price: "79228162514264337593543950335USD".parse().unwrap(),
            ..rental(Status::Draft)
        };

        assert_eq!(r.total_price(), None);
    }
}
