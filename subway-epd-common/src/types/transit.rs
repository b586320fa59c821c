use serde::{Deserialize, Serialize};

/// 单趟列车的到站信息
///
/// 相等性只比较 `(train_id, minutes_until_arrival)`：重新拉取后时间相同的重复项视为未变化。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitArrival {
    pub train_id: String,
    pub route_id: String,
    /// 到站时刻，格式如 `08:42 AM`
    pub arrival_time: String,
    pub minutes_until_arrival: u32,
}

impl TransitArrival {
    pub fn new(
        train_id: impl Into<String>,
        route_id: impl Into<String>,
        arrival_time: impl Into<String>,
        minutes_until_arrival: u32,
    ) -> Self {
        Self {
            train_id: train_id.into(),
            route_id: route_id.into(),
            arrival_time: arrival_time.into(),
            minutes_until_arrival,
        }
    }
}

impl PartialEq for TransitArrival {
    fn eq(&self, other: &Self) -> bool {
        self.train_id == other.train_id && self.minutes_until_arrival == other.minutes_until_arrival
    }
}

impl Eq for TransitArrival {}

/// 最先到站的两趟列车，用于判断变化是否显著
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopTwo {
    pub first: Option<TransitArrival>,
    pub second: Option<TransitArrival>,
}

impl TopTwo {
    pub fn new(first: Option<TransitArrival>, second: Option<TransitArrival>) -> Self {
        Self { first, second }
    }

    pub fn pairs<'a>(
        &'a self,
        other: &'a TopTwo,
    ) -> [(Option<&'a TransitArrival>, Option<&'a TransitArrival>); 2] {
        [
            (self.first.as_ref(), other.first.as_ref()),
            (self.second.as_ref(), other.second.as_ref()),
        ]
    }
}

/// 列车快照，按 `minutes_until_arrival` 升序排列
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<TransitArrival>", into = "Vec<TransitArrival>")]
pub struct TransitSnapshot {
    arrivals: Vec<TransitArrival>,
}

impl TransitSnapshot {
    pub fn new(mut arrivals: Vec<TransitArrival>) -> Self {
        arrivals.sort_by_key(|a| a.minutes_until_arrival);
        Self { arrivals }
    }

    pub fn arrivals(&self) -> &[TransitArrival] {
        &self.arrivals
    }

    pub fn len(&self) -> usize {
        self.arrivals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrivals.is_empty()
    }

    pub fn top_two(&self) -> TopTwo {
        TopTwo::new(self.arrivals.first().cloned(), self.arrivals.get(1).cloned())
    }
}

impl From<Vec<TransitArrival>> for TransitSnapshot {
    fn from(arrivals: Vec<TransitArrival>) -> Self {
        Self::new(arrivals)
    }
}

impl From<TransitSnapshot> for Vec<TransitArrival> {
    fn from(snapshot: TransitSnapshot) -> Self {
        snapshot.arrivals
    }
}
