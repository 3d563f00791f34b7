//! Input synchronization state for the two linked amount fields
//!
//! Exactly one field is authoritative (typed by the user, set by "Max", or
//! carried over by a reversal); the other is derived from it. Derived writes
//! go through [`TradeIntent::write_derived`], which cannot change authority,
//! so a derived update never feeds back into another recomputation.

use serde::{Deserialize, Serialize};
use swap_types::{AssetId, FixedPoint, RawAmount};

/// Which field the user last set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Authority {
    EditingFrom,
    EditingTo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldOrigin {
    User,
    Derived,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountField {
    pub raw: RawAmount,
    pub text: String,
    pub origin: FieldOrigin,
}

impl AmountField {
    pub fn empty(origin: FieldOrigin) -> Self {
        Self {
            raw: RawAmount::ZERO,
            text: String::new(),
            origin,
        }
    }
}

/// Named state-machine transitions, logged at debug
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    EditFrom,
    EditTo,
    SetMax,
    SelectFrom,
    SelectTo,
    Reverse,
    SnapshotRefresh,
    SlippageChange,
}

/// The user's in-progress trade
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeIntent {
    pub from_asset: Option<AssetId>,
    pub to_asset: Option<AssetId>,
    pub authority: Authority,
    pub from: AmountField,
    pub to: AmountField,
    pub slippage: FixedPoint,
    pub pool_index: Option<usize>,
}

impl TradeIntent {
    pub fn new(slippage: FixedPoint) -> Self {
        Self {
            from_asset: None,
            to_asset: None,
            authority: Authority::EditingFrom,
            from: AmountField::empty(FieldOrigin::User),
            to: AmountField::empty(FieldOrigin::Derived),
            slippage,
            pool_index: None,
        }
    }

    pub fn authoritative(&self) -> &AmountField {
        match self.authority {
            Authority::EditingFrom => &self.from,
            Authority::EditingTo => &self.to,
        }
    }

    pub fn derived(&self) -> &AmountField {
        match self.authority {
            Authority::EditingFrom => &self.to,
            Authority::EditingTo => &self.from,
        }
    }

    /// Asset of the authoritative field
    pub fn authoritative_asset(&self) -> Option<AssetId> {
        match self.authority {
            Authority::EditingFrom => self.from_asset,
            Authority::EditingTo => self.to_asset,
        }
    }

    /// User-originated write; makes `authority` the authoritative side
    pub fn write_authoritative(&mut self, authority: Authority, text: String, raw: RawAmount) {
        self.authority = authority;
        let (user, derived) = match authority {
            Authority::EditingFrom => (&mut self.from, &mut self.to),
            Authority::EditingTo => (&mut self.to, &mut self.from),
        };
        *user = AmountField {
            raw,
            text,
            origin: FieldOrigin::User,
        };
        derived.origin = FieldOrigin::Derived;
    }

    /// Re-parse of the authoritative text (e.g. after a precision change)
    pub fn refresh_authoritative_raw(&mut self, raw: RawAmount) {
        match self.authority {
            Authority::EditingFrom => self.from.raw = raw,
            Authority::EditingTo => self.to.raw = raw,
        }
    }

    /// Engine-originated write to the non-authoritative field
    pub fn write_derived(&mut self, text: String, raw: RawAmount) {
        let field = AmountField {
            raw,
            text,
            origin: FieldOrigin::Derived,
        };
        match self.authority {
            Authority::EditingFrom => self.to = field,
            Authority::EditingTo => self.from = field,
        }
    }

    /// Swap sides: the old "to" text becomes the authoritative "from" text
    ///
    /// Returns the carried text; the caller re-parses it at the new "from"
    /// precision before recording the raw amount.
    pub fn reverse(&mut self) -> String {
        std::mem::swap(&mut self.from_asset, &mut self.to_asset);
        let carried = std::mem::take(&mut self.to.text);
        self.authority = Authority::EditingFrom;
        self.from = AmountField {
            raw: RawAmount::ZERO,
            text: carried.clone(),
            origin: FieldOrigin::User,
        };
        self.to = AmountField::empty(FieldOrigin::Derived);
        self.pool_index = None;
        carried
    }

    /// Exactly one field carries the user origin
    pub fn authority_is_exclusive(&self) -> bool {
        self.authoritative().origin == FieldOrigin::User
            && self.derived().origin == FieldOrigin::Derived
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_write_keeps_authority() {
        let mut intent = TradeIntent::new(FixedPoint::zero(12));
        intent.write_authoritative(Authority::EditingTo, "5".into(), RawAmount::new(5));
        intent.write_derived("2.5".into(), RawAmount::new(25));

        assert_eq!(intent.authority, Authority::EditingTo);
        assert_eq!(intent.to.text, "5");
        assert_eq!(intent.from.text, "2.5");
        assert!(intent.authority_is_exclusive());
    }

    #[test]
    fn test_reverse_carries_to_text() {
        let a = AssetId::from_bytes([1; 32]);
        let b = AssetId::from_bytes([2; 32]);
        let mut intent = TradeIntent::new(FixedPoint::zero(12));
        intent.from_asset = Some(a);
        intent.to_asset = Some(b);
        intent.write_authoritative(Authority::EditingTo, "19.94".into(), RawAmount::new(1994));

        let carried = intent.reverse();

        assert_eq!(carried, "19.94");
        assert_eq!(intent.from_asset, Some(b));
        assert_eq!(intent.to_asset, Some(a));
        assert_eq!(intent.authority, Authority::EditingFrom);
        assert_eq!(intent.from.text, "19.94");
        assert!(intent.to.text.is_empty());
        assert!(intent.authority_is_exclusive());
    }
}
