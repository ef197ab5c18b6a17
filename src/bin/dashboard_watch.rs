//! 看板接口轮询工具：按固定周期请求一个看板路由，每轮输出一行数据来源与条目数。
//! 用于观察上游何时从模拟数据切回真实数据（或反过来）。

use std::env;
use std::time::Duration;

use drt_backend::Poller;
use reqwest::Client;
use serde_json::Value;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000/api/v1/dashboard";
const DEFAULT_ROUTE: &str = "realtime/heatmap-data";
const DEFAULT_INTERVAL_SECS: u64 = 30;
const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("参数错误: {0}")]
    Args(String),
    #[error("HTTP 客户端初始化失败: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
struct Args {
    help: bool,
    base_url: String,
    route: String,
    interval_secs: u64,
}

impl Args {
    fn parse(argv: Vec<String>) -> Result<Self, CliError> {
        let mut help = false;
        let mut base_url = DEFAULT_BASE_URL.to_string();
        let mut route = DEFAULT_ROUTE.to_string();
        let mut interval_secs = DEFAULT_INTERVAL_SECS;
        let mut idx = 0usize;

        while idx < argv.len() {
            match argv[idx].as_str() {
                "-h" | "--help" => {
                    help = true;
                    idx += 1;
                }
                "--base-url" => {
                    idx += 1;
                    base_url = value_of(&argv, idx, "--base-url")?;
                    idx += 1;
                }
                "--route" => {
                    idx += 1;
                    route = value_of(&argv, idx, "--route")?;
                    idx += 1;
                }
                "--interval-secs" => {
                    idx += 1;
                    let raw = value_of(&argv, idx, "--interval-secs")?;
                    interval_secs = raw
                        .parse::<u64>()
                        .ok()
                        .filter(|v| *v > 0)
                        .ok_or_else(|| CliError::Args(format!("--interval-secs 无效: {raw}")))?;
                    idx += 1;
                }
                other => return Err(CliError::Args(format!("未知参数: {other}"))),
            }
        }

        Ok(Self {
            help,
            base_url,
            route,
            interval_secs,
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.route.trim_start_matches('/')
        )
    }
}

fn value_of(argv: &[String], idx: usize, flag: &str) -> Result<String, CliError> {
    argv.get(idx)
        .cloned()
        .ok_or_else(|| CliError::Args(format!("缺少 {flag} 的值")))
}

/// 真实响应没有 `meta`；回退与占位响应在 `meta.data_source` 中标记来源
fn data_source(body: &Value) -> &str {
    body.pointer("/meta/data_source")
        .and_then(Value::as_str)
        .unwrap_or("Seoul Open API")
}

/// 各路由 `data` 中的主列表
const ITEM_POINTERS: [&str; 5] = [
    "/data/heatmap_points",
    "/data/poi_data",
    "/data/hourly_data",
    "/data/forecasts",
    "/data/chart_data/labels",
];

/// 第一个存在的主列表的长度
fn item_count(body: &Value) -> Option<usize> {
    ITEM_POINTERS
        .iter()
        .find_map(|p| body.pointer(p).and_then(Value::as_array).map(Vec::len))
}

async fn poll_once(client: &Client, url: &str) {
    let resp = match client.get(url).send().await {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!("请求失败: {}", e);
            return;
        }
    };
    let status = resp.status();
    match resp.json::<Value>().await {
        Ok(body) => tracing::info!(
            status = status.as_u16(),
            data_source = data_source(&body),
            items = item_count(&body).unwrap_or(0),
            "tick"
        ),
        Err(e) => tracing::warn!(status = status.as_u16(), "响应不是 JSON: {}", e),
    }
}

fn print_help() {
    println!(
        r#"dashboard_watch（看板接口轮询）

参数：
  --base-url URL            看板接口前缀（默认 {DEFAULT_BASE_URL}）
  --route PATH              轮询的路由（默认 {DEFAULT_ROUTE}）
  --interval-secs N         轮询周期秒数（默认 {DEFAULT_INTERVAL_SECS}）
  -h, --help                显示帮助

Ctrl+C 退出。"#
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dashboard_watch=info".into()),
        )
        .try_init();

    let args = Args::parse(env::args().skip(1).collect())?;
    if args.help {
        print_help();
        return Ok(());
    }

    let client = Client::builder()
        .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .build()
        .map_err(CliError::from)?;
    let url = args.url();
    tracing::info!("每 {} 秒轮询 {}", args.interval_secs, url);

    let poller = Poller::start(Duration::from_secs(args.interval_secs), move || {
        let client = client.clone();
        let url = url.clone();
        async move { poll_once(&client, &url).await }
    });

    tokio::signal::ctrl_c().await?;
    poller.stop();
    tracing::info!("已停止轮询");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn argv(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_point_at_local_heatmap() {
        let args = Args::parse(Vec::new()).expect("parse");
        assert_eq!(
            args.url(),
            "http://127.0.0.1:3000/api/v1/dashboard/realtime/heatmap-data"
        );
        assert_eq!(args.interval_secs, 30);
    }

    #[test]
    fn flags_override_defaults() {
        let args = Args::parse(argv(&[
            "--base-url",
            "http://h:1/api/",
            "--route",
            "/realtime/poi-population",
            "--interval-secs",
            "5",
        ]))
        .expect("parse");
        assert_eq!(args.url(), "http://h:1/api/realtime/poi-population");
        assert_eq!(args.interval_secs, 5);
    }

    #[test]
    fn bad_flags_are_rejected() {
        assert!(Args::parse(argv(&["--interval-secs", "0"])).is_err());
        assert!(Args::parse(argv(&["--route"])).is_err());
        assert!(Args::parse(argv(&["--verbose"])).is_err());
    }

    #[test]
    fn summary_reads_source_and_route_list() {
        let fallback = json!({
            "data": { "heatmap_points": [[1.0, 2.0, 0.5]], "bounds": {} },
            "meta": { "data_source": "Mock Data (API Error)" }
        });
        assert_eq!(data_source(&fallback), "Mock Data (API Error)");
        assert_eq!(item_count(&fallback), Some(1));

        let real = json!({ "data": { "area_name": "x", "metadata": { "tags": [1, 2] } } });
        assert_eq!(data_source(&real), "Seoul Open API");
        assert_eq!(item_count(&real), None);

        let stop = json!({ "data": { "nearby_info": { "routes": ["472"] }, "hourly_data": [{}, {}] } });
        assert_eq!(item_count(&stop), Some(2));

        // 字母序更靠前的数组不计入
        let poi = json!({ "data": { "alerts": [1, 2, 3], "poi_data": [{}] } });
        assert_eq!(item_count(&poi), Some(1));
    }
}
