//! 列车变化显著性判断
//!
//! 只比较最先到站的两趟列车，列表更深处的变化不会触发立即重绘，以限制刷新频率。

use subway_epd_common::TopTwo;

/// 判断前两趟列车的变化是否需要立即重绘
pub fn significant_change(previous: &TopTwo, current: &TopTwo) -> bool {
    // 从无到有
    if previous.first.is_none() && current.first.is_some() {
        return true;
    }
    // 没有列车时也要重绘出“无列车”状态
    if current.first.is_none() {
        return true;
    }

    previous.pairs(current).into_iter().any(|pair| match pair {
        (Some(prev), Some(curr)) => {
            prev.train_id != curr.train_id
                || prev.minutes_until_arrival != curr.minutes_until_arrival
        }
        (None, None) => false,
        _ => true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use subway_epd_common::TransitArrival;

    fn train(id: &str, minutes: u32) -> Option<TransitArrival> {
        Some(TransitArrival::new(id, "F", "08:00 AM", minutes))
    }

    #[test]
    fn identical_top_two_is_not_significant() {
        let previous = TopTwo::new(train("A", 5), train("B", 12));
        let current = TopTwo::new(train("A", 5), train("B", 12));
        assert!(!significant_change(&previous, &current));
    }

    #[test]
    fn route_and_clock_time_do_not_matter() {
        let previous = TopTwo::new(train("A", 5), None);
        let current = TopTwo::new(
            Some(TransitArrival::new("A", "G", "08:06 AM", 5)),
            None,
        );
        assert!(!significant_change(&previous, &current));
    }

    #[test]
    fn first_train_appearing_is_significant() {
        let current = TopTwo::new(train("A", 5), None);
        assert!(significant_change(&TopTwo::default(), &current));
    }

    #[test]
    fn no_trains_is_always_significant() {
        assert!(significant_change(&TopTwo::default(), &TopTwo::default()));
        assert!(significant_change(
            &TopTwo::new(train("A", 5), train("B", 12)),
            &TopTwo::default()
        ));
    }

    #[test]
    fn minutes_or_identity_change_is_significant() {
        let previous = TopTwo::new(train("A", 5), train("B", 12));
        assert!(significant_change(&previous, &TopTwo::new(train("A", 4), train("B", 12))));
        assert!(significant_change(&previous, &TopTwo::new(train("A", 5), train("C", 12))));
    }

    #[test]
    fn second_train_appearing_or_leaving_is_significant() {
        let one = TopTwo::new(train("A", 5), None);
        let two = TopTwo::new(train("A", 5), train("B", 12));
        assert!(significant_change(&one, &two));
        assert!(significant_change(&two, &one));
    }
}
