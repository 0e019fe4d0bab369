use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Club member identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberId(Uuid);

impl MemberId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for MemberId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MemberId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Subscription identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SubscriptionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Freeze request identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FreezeRequestId(Uuid);

impl FreezeRequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for FreezeRequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FreezeRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Payment identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaymentId(Uuid);

impl PaymentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for PaymentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Subscription plan identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlanId(String);

impl PlanId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    pub fn monthly() -> Self {
        Self("monthly".to_string())
    }

    pub fn quarterly() -> Self {
        Self("quarterly".to_string())
    }

    pub fn annual() -> Self {
        Self("annual".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Payment method identifier (cash desk, card terminal, bank transfer, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaymentMethodId(String);

impl PaymentMethodId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    pub fn cash() -> Self {
        Self("cash".to_string())
    }

    pub fn card() -> Self {
        Self("card".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaymentMethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Currencies the ledger accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Eur,
    Egp,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Egp => "EGP",
        }
    }

    /// Number of minor-unit digits (all supported currencies use 2)
    pub fn exponent(&self) -> u32 {
        2
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Monetary amount held as an integer minor-unit count.
///
/// All arithmetic is exact integer arithmetic; the `Decimal` conversions
/// exist only at the display/parsing boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    minor: i64,
    currency: Currency,
}

impl Money {
    pub fn zero(currency: Currency) -> Self {
        Self { minor: 0, currency }
    }

    pub fn from_minor(minor: i64, currency: Currency) -> Self {
        Self { minor, currency }
    }

    /// Parse from a decimal amount in major units.
    ///
    /// Returns `None` when the amount carries more fractional digits than the
    /// currency has, or does not fit in an `i64` minor-unit count.
    pub fn from_decimal(amount: Decimal, currency: Currency) -> Option<Self> {
        let factor = Decimal::from(10_i64.pow(currency.exponent()));
        let scaled = amount.checked_mul(factor)?;
        if !scaled.is_integer() {
            return None;
        }
        Some(Self {
            minor: scaled.to_i64()?,
            currency,
        })
    }

    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.minor, self.currency.exponent())
    }

    pub fn minor_units(&self) -> i64 {
        self.minor
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn is_zero(&self) -> bool {
        self.minor == 0
    }

    pub fn is_positive(&self) -> bool {
        self.minor > 0
    }

    pub fn same_currency(&self, other: &Money) -> bool {
        self.currency == other.currency
    }

    /// Exact addition. `None` on currency mismatch or overflow.
    pub fn checked_add(&self, other: Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        Some(Self {
            minor: self.minor.checked_add(other.minor)?,
            currency: self.currency,
        })
    }

    /// Exact subtraction. `None` on currency mismatch or when the result
    /// would be negative.
    pub fn checked_sub(&self, other: Money) -> Option<Money> {
        if self.currency != other.currency || self.minor < other.minor {
            return None;
        }
        Some(Self {
            minor: self.minor - other.minor,
            currency: self.currency,
        })
    }

    /// Multiply by an integer quantity.
    pub fn times(&self, quantity: u32) -> Option<Money> {
        Some(Self {
            minor: self.minor.checked_mul(i64::from(quantity))?,
            currency: self.currency,
        })
    }

    /// Strictly greater than, assuming the caller has already checked the
    /// currencies match.
    pub fn exceeds(&self, other: &Money) -> bool {
        self.minor > other.minor
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.to_decimal(), self.currency.code())
    }
}

/// Subscription plan template.
///
/// `max_entries` of zero means unlimited entries. Templates are resolved
/// through the plan catalog at creation time and snapshotted into the
/// aggregate; later template edits never touch existing subscriptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionType {
    pub id: PlanId,
    pub name: String,
    pub max_entries: u32,
    pub duration_days: u32,
    pub price: Money,
}

impl SubscriptionType {
    pub fn snapshot(&self) -> PlanSnapshot {
        PlanSnapshot {
            name: self.name.clone(),
            max_entries: self.max_entries,
            duration_days: self.duration_days,
            price: self.price,
        }
    }
}

/// Plan fields captured at subscription creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSnapshot {
    pub name: String,
    pub max_entries: u32,
    pub duration_days: u32,
    pub price: Money,
}

/// Subscription lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Upcoming,
    Active,
    Frozen,
    Expired,
    Cancelled,
}

impl SubscriptionStatus {
    /// Cancellation is the only terminal state; an expired subscription can
    /// still be renewed into a new period.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SubscriptionStatus::Cancelled)
    }

    /// Whether a member in this state may pass the entrance gate.
    pub fn grants_access(&self) -> bool {
        matches!(self, SubscriptionStatus::Active)
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubscriptionStatus::Upcoming => write!(f, "upcoming"),
            SubscriptionStatus::Active => write!(f, "active"),
            SubscriptionStatus::Frozen => write!(f, "frozen"),
            SubscriptionStatus::Expired => write!(f, "expired"),
            SubscriptionStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_from_decimal_exact() {
        let price = Money::from_decimal(dec!(100.00), Currency::Usd).unwrap();
        assert_eq!(price.minor_units(), 10_000);
        assert_eq!(price.to_decimal(), dec!(100.00));
    }

    #[test]
    fn test_money_rejects_sub_minor_precision() {
        assert!(Money::from_decimal(dec!(0.005), Currency::Usd).is_none());
        assert!(Money::from_decimal(dec!(19.999), Currency::Eur).is_none());
    }

    #[test]
    fn test_money_arithmetic() {
        let a = Money::from_minor(6_000, Currency::Usd);
        let b = Money::from_minor(4_000, Currency::Usd);

        assert_eq!(a.checked_add(b).unwrap().minor_units(), 10_000);
        assert_eq!(a.checked_sub(b).unwrap().minor_units(), 2_000);
        assert!(b.checked_sub(a).is_none());
        assert_eq!(b.times(3).unwrap().minor_units(), 12_000);
    }

    #[test]
    fn test_money_currency_mismatch() {
        let usd = Money::from_minor(100, Currency::Usd);
        let eur = Money::from_minor(100, Currency::Eur);

        assert!(usd.checked_add(eur).is_none());
        assert!(usd.checked_sub(eur).is_none());
        assert!(!usd.same_currency(&eur));
    }

    #[test]
    fn test_money_display() {
        let price = Money::from_minor(12_345, Currency::Egp);
        assert_eq!(price.to_string(), "123.45 EGP");
    }

    #[test]
    fn test_money_equality_is_minor_unit_equality() {
        assert_eq!(
            Money::from_decimal(dec!(100), Currency::Usd).unwrap(),
            Money::from_decimal(dec!(100.00), Currency::Usd).unwrap()
        );
    }

    #[test]
    fn test_status_terminality() {
        assert!(SubscriptionStatus::Cancelled.is_terminal());
        assert!(!SubscriptionStatus::Expired.is_terminal());
        assert!(!SubscriptionStatus::Active.is_terminal());
    }
}
