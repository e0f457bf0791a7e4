use serde::{Deserialize, Deserializer, Serialize};

/// One stock unit consumed by a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bin {
    pub remaining_space: u32,
    pub pieces: Vec<u32>,
}

impl Bin {
    pub(crate) fn new(capacity: u32, piece: u32) -> Self {
        Self {
            remaining_space: capacity - piece,
            pieces: vec![piece],
        }
    }

    pub fn fits(&self, piece: u32) -> bool {
        self.remaining_space >= piece
    }

    pub(crate) fn push(&mut self, piece: u32) {
        debug_assert!(self.fits(piece));
        self.remaining_space -= piece;
        self.pieces.push(piece);
    }

    pub fn used(&self) -> u64 {
        self.pieces.iter().map(|&p| p as u64).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub capacity: u32,
    /// Bins in creation order.
    pub bins: Vec<Bin>,
}

impl Plan {
    pub fn empty(capacity: u32) -> Self {
        Self {
            capacity,
            bins: vec![],
        }
    }

    pub fn bin_count(&self) -> usize {
        self.bins.len()
    }

    pub fn piece_count(&self) -> usize {
        self.bins.iter().map(|b| b.pieces.len()).sum()
    }

    pub fn total_waste(&self) -> u64 {
        self.bins.iter().map(|b| b.remaining_space as u64).sum()
    }

    pub fn total_waste_percent(&self) -> f64 {
        let total_stock = self.capacity as u64 * self.bins.len() as u64;
        if total_stock == 0 {
            return 0.0;
        }
        self.total_waste() as f64 / total_stock as f64 * 100.0
    }

    /// Bins sorted by least waste first. Equal waste keeps creation order.
    pub fn display_order(&self) -> Vec<&Bin> {
        let mut bins: Vec<&Bin> = self.bins.iter().collect();
        bins.sort_by_key(|b| b.remaining_space);
        bins
    }
}

/// Accepts whole JSON numbers written as floats (`1200.0`) as well as integers.
pub fn deserialize_u32_from_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value.fract() != 0.0 || value < 0.0 || value > u32::MAX as f64 {
        return Err(serde::de::Error::custom(format!(
            "expected a non-negative whole number, got {value}"
        )));
    }
    Ok(value as u32)
}

/// `deserialize_u32_from_number` for every element of a JSON array.
pub fn deserialize_u32_vec_from_numbers<'de, D>(deserializer: D) -> Result<Vec<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Whole(#[serde(deserialize_with = "deserialize_u32_from_number")] u32);

    let values = Vec::<Whole>::deserialize(deserializer)?;
    Ok(values.into_iter().map(|Whole(v)| v).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bin_push_decrements_remaining() {
        let mut bin = Bin::new(10, 6);
        assert_eq!(bin.remaining_space, 4);
        assert!(bin.fits(4));
        assert!(!bin.fits(5));
        bin.push(4);
        assert_eq!(bin.remaining_space, 0);
        assert_eq!(bin.pieces, vec![6, 4]);
        assert_eq!(bin.used(), 10);
    }

    #[test]
    fn test_waste_percent() {
        let plan = Plan {
            capacity: 100,
            bins: vec![
                Bin {
                    remaining_space: 0,
                    pieces: vec![100],
                },
                Bin {
                    remaining_space: 50,
                    pieces: vec![50],
                },
            ],
        };
        assert_eq!(plan.total_waste(), 50);
        assert_eq!(plan.piece_count(), 2);
        assert!((plan.total_waste_percent() - 25.0).abs() < 0.01);
        assert_eq!(Plan::empty(100).total_waste_percent(), 0.0);
    }

    #[test]
    fn test_display_order_least_waste_first() {
        let plan = Plan {
            capacity: 10,
            bins: vec![
                Bin {
                    remaining_space: 3,
                    pieces: vec![7],
                },
                Bin {
                    remaining_space: 0,
                    pieces: vec![8, 2],
                },
                Bin {
                    remaining_space: 3,
                    pieces: vec![4, 3],
                },
            ],
        };
        let order: Vec<&Vec<u32>> = plan.display_order().into_iter().map(|b| &b.pieces).collect();
        assert_eq!(order, vec![&vec![8, 2], &vec![7], &vec![4, 3]]);
        // Plan itself keeps creation order
        assert_eq!(plan.bins[0].pieces, vec![7]);
    }

    #[test]
    fn test_deserialize_u32_from_number() {
        #[derive(Deserialize)]
        struct Wrapper {
            #[serde(deserialize_with = "deserialize_u32_from_number")]
            n: u32,
        }
        let w: Wrapper = serde_json::from_str(r#"{"n": 1200.0}"#).unwrap();
        assert_eq!(w.n, 1200);
        let w: Wrapper = serde_json::from_str(r#"{"n": 6000}"#).unwrap();
        assert_eq!(w.n, 6000);
        assert!(serde_json::from_str::<Wrapper>(r#"{"n": 12.5}"#).is_err());
        assert!(serde_json::from_str::<Wrapper>(r#"{"n": -1}"#).is_err());
    }

    #[test]
    fn test_deserialize_u32_vec_from_numbers() {
        #[derive(Deserialize)]
        struct Wrapper {
            #[serde(deserialize_with = "deserialize_u32_vec_from_numbers")]
            v: Vec<u32>,
        }
        let w: Wrapper = serde_json::from_str(r#"{"v": [2.0, 800, 0]}"#).unwrap();
        assert_eq!(w.v, vec![2, 800, 0]);
        assert!(serde_json::from_str::<Wrapper>(r#"{"v": [2.5]}"#).is_err());
        assert!(serde_json::from_str::<Wrapper>(r#"{"v": [-1]}"#).is_err());
    }
}
