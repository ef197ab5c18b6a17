use crate::features::upstream::{HOURS, hour_label};

use super::models::{ChartData, ChartDataset, HourlySeries};

/// 24 个小时标签 "00".."23"
pub fn hour_labels() -> Vec<String> {
    (0..HOURS).map(hour_label).collect()
}

fn dataset(label: &str, data: &[u64], border: &str, background: &str) -> ChartDataset {
    ChartDataset {
        label: label.to_string(),
        data: data.to_vec(),
        border_color: border.to_string(),
        background_color: background.to_string(),
        fill: true,
    }
}

/// 把上下车序列整理为 Chart.js 折线图结构
pub fn chart_data(series: &HourlySeries) -> ChartData {
    ChartData {
        labels: hour_labels(),
        datasets: vec![
            dataset(
                "승차인원",
                &series.boarding,
                "#3b82f6",
                "rgba(59, 130, 246, 0.1)",
            ),
            dataset(
                "하차인원",
                &series.alighting,
                "#ef4444",
                "rgba(239, 68, 68, 0.1)",
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_has_ordered_labels_and_two_datasets() {
        let series = HourlySeries {
            boarding: (0..24).collect(),
            alighting: vec![1; 24],
        };
        let chart = chart_data(&series);
        assert_eq!(chart.labels.first().map(String::as_str), Some("00"));
        assert_eq!(chart.labels.last().map(String::as_str), Some("23"));
        assert_eq!(chart.datasets.len(), 2);
        assert_eq!(chart.datasets[0].label, "승차인원");
        assert_eq!(chart.datasets[0].data[5], 5);
        assert_eq!(chart.datasets[1].border_color, "#ef4444");
        assert!(chart.datasets.iter().all(|d| d.fill));
    }

    #[test]
    fn formatting_is_deterministic() {
        let series = HourlySeries {
            boarding: vec![3; 24],
            alighting: vec![2; 24],
        };
        let a = serde_json::to_vec(&chart_data(&series)).expect("serialize");
        let b = serde_json::to_vec(&chart_data(&series)).expect("serialize");
        assert_eq!(a, b);
    }
}
