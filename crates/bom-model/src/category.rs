//! Closed category sets
//!
//! Every aggregator buckets features into a fixed, known-in-advance set of
//! categories. Each set is an enum implementing [`Category`], and
//! [`CategoryTotals`] keeps one accumulator per variant so the key space of
//! a result is always fully populated.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::iter::Sum;
use std::ops::AddAssign;

/// A closed set of category codes
pub trait Category: Copy + Eq + Ord + Hash + Debug + Send + Sync + 'static {
    /// Every variant, in reporting order
    const ALL: &'static [Self];

    /// Source code as stored in the layer attribute
    fn code(self) -> &'static str;

    /// Exact-match classification of a raw attribute value
    #[must_use]
    fn classify(raw: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|category| category.code() == raw)
    }
}

macro_rules! closed_category {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $code:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            const VARIANTS: &'static [Self] = &[$(Self::$variant),+];
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.code())
            }
        }

        impl Category for $name {
            const ALL: &'static [Self] = Self::VARIANTS;

            fn code(self) -> &'static str {
                match self {
                    $( Self::$variant => $code ),+
                }
            }
        }
    };
}

/// Conduit diameter bucket
///
/// Classification is a substring test in declaration order, so `"1.25\""`
/// lands in [`ConduitSize::Inch1_25`] before the `"2"` test ever runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConduitSize {
    /// 1.25 inch
    Inch1_25,
    /// 2 inch
    Inch2,
    /// 4 inch, special crossings only
    Inch4,
}

impl std::fmt::Display for ConduitSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\"", self.code())
    }
}

impl Category for ConduitSize {
    const ALL: &'static [Self] = &[Self::Inch1_25, Self::Inch2, Self::Inch4];

    fn code(self) -> &'static str {
        match self {
            Self::Inch1_25 => "1.25",
            Self::Inch2 => "2",
            Self::Inch4 => "4",
        }
    }

    fn classify(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL.iter().copied().find(|size| raw.contains(size.code()))
    }
}

closed_category! {
    /// Underground structure type (`structuretype`)
    pub enum StructureType {
        /// Flowerpot
        Fp => "FP",
        /// Small vault
        Sv => "SV",
        /// Medium vault
        Mv => "MV",
        /// Large vault
        Lv => "LV",
        /// XL vault
        Xl => "XL",
        /// Extra-small vault
        Xsv => "XSV",
        /// Network interface box
        NidBox => "NID Box",
        /// XXL vault
        Xxl => "XXL",
    }
}

closed_category! {
    /// Splice closure size (`splicesize`)
    pub enum SpliceSize {
        /// Coyote One closure
        CoyoteOne => "Coyote One",
        /// 6.5" x 17"
        X17 => "6.5\"x17\"",
        /// 6.5" x 22"
        X22 => "6.5\"x22\"",
        /// 9.5" x 28"
        X28 => "9.5\"x28\"",
        /// 9.5" x 19"
        X19 => "9.5\"x19\"",
        /// Runt closure
        Runt => "RUNT",
    }
}

closed_category! {
    /// Fiber count bucket (`fibercount`, `cable_capacity`)
    pub enum FiberCount {
        /// 12 strands
        F12 => "12",
        /// 24 strands
        F24 => "24",
        /// 48 strands
        F48 => "48",
        /// 96 strands
        F96 => "96",
        /// 144 strands
        F144 => "144",
        /// 288 strands
        F288 => "288",
        /// 432 strands
        F432 => "432",
    }
}

closed_category! {
    /// Aerial / underground placement
    pub enum Placement {
        /// Underground
        Ug => "UG",
        /// Aerial
        Ae => "AE",
    }
}

closed_category! {
    /// Distribution hierarchy tier
    pub enum Hierarchy {
        /// Feeder
        F1 => "F1",
        /// Distribution
        F2 => "F2",
    }
}

closed_category! {
    /// Passive cabinet size (`Cab_Size`)
    pub enum CabinetSize {
        /// 144 port
        S144 => "144",
        /// 288 port
        S288 => "288",
        /// 432 port
        S432 => "432",
        /// 576 port
        S576 => "576",
    }
}

closed_category! {
    /// Guy / anchor type (`Guy_Type`)
    pub enum GuyType {
        /// Down guy
        Down => "Down",
        /// Dirt anchor
        Dirt => "Dirt",
        /// Rock anchor
        Rock => "Rock",
    }
}

/// One accumulator per category variant
///
/// Created fully populated with zeros; there is no way to remove a key.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotals<C: Category, T = f64> {
    values: BTreeMap<C, T>,
}

impl<C, T> CategoryTotals<C, T>
where
    C: Category,
    T: Copy + Default + AddAssign,
{
    /// Create totals with every category at zero
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: C::ALL.iter().map(|category| (*category, T::default())).collect(),
        }
    }

    /// Add to a category
    #[inline]
    pub fn add(&mut self, category: C, amount: T) {
        if let Some(total) = self.values.get_mut(&category) {
            *total += amount;
        }
    }

    /// Total for a category
    #[inline]
    #[must_use]
    pub fn get(&self, category: C) -> T {
        self.values.get(&category).copied().unwrap_or_default()
    }

    /// Iterate categories in reporting order
    pub fn iter(&self) -> impl Iterator<Item = (C, T)> + '_ {
        self.values.iter().map(|(category, total)| (*category, *total))
    }

    /// Apply a function to every total
    #[must_use]
    pub fn map<U, F>(&self, mut f: F) -> CategoryTotals<C, U>
    where
        U: Copy + Default + AddAssign,
        F: FnMut(T) -> U,
    {
        CategoryTotals {
            values: self
                .values
                .iter()
                .map(|(category, total)| (*category, f(*total)))
                .collect(),
        }
    }
}

impl<C, T> CategoryTotals<C, T>
where
    C: Category,
    T: Copy + Default + AddAssign + Sum<T>,
{
    /// Sum over all categories
    #[must_use]
    pub fn sum(&self) -> T {
        self.values.values().copied().sum()
    }
}

impl<C, T> Default for CategoryTotals<C, T>
where
    C: Category,
    T: Copy + Default + AddAssign,
{
    fn default() -> Self {
        Self::new()
    }
}
