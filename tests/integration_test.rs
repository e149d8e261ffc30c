use assert_cmd::Command;
use mockito::Server;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn pricing_page_one(base_url: &str) -> String {
    format!(
        r#"{{
            "Items": [
                {{
                    "armSkuName": "D2s_v3",
                    "productName": "Virtual Machines Dsv3 Series AMD",
                    "armRegionName": "westus",
                    "unitPrice": 0.096,
                    "currencyCode": "USD",
                    "meterRegion": "US West",
                    "serviceFamily": "Compute",
                    "type": "Consumption"
                }},
                {{
                    "armSkuName": "X9_v2",
                    "productName": "Excluded Series",
                    "unitPrice": 1.5
                }},
                {{
                    "armSkuName": "P3",
                    "productName": "P Series Intel",
                    "unitPrice": 0.5,
                    "currencyCode": "USD"
                }}
            ],
            "NextPageLink": "{base_url}/prices2"
        }}"#
    )
}

const PRICING_PAGE_TWO: &str = r#"{
    "Items": [
        {
            "armSkuName": "F4s_v2",
            "productName": "Fsv2 Series",
            "armRegionName": "eastus",
            "unitPrice": 0.169,
            "currencyCode": "USD"
        }
    ]
}"#;

const CATALOG_BODY: &str = r#"{
    "m5.large": {"instance_type": "m5.large", "processor": "Intel Xeon Platinum 8175", "vcpus": 2},
    "m6g.large": {"instance_type": "m6g.large", "processor": "AWS Graviton2 (arm)", "vcpus": 2}
}"#;

#[test]
fn test_end_to_end_collect() {
    let mut server = Server::new();
    let url = server.url();

    let _pricing_one = server
        .mock("GET", "/prices")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(pricing_page_one(&url))
        .create();
    let _pricing_two = server
        .mock("GET", "/prices2")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(PRICING_PAGE_TWO)
        .create();

    // First catalog mirror is dead so the run exercises the fallback.
    let catalog_down = server
        .mock("GET", "/catalog-down")
        .with_status(404)
        .expect(1)
        .create();
    let catalog_up = server
        .mock("GET", "/catalog")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(CATALOG_BODY)
        .expect(1)
        .create();

    let out_dir = tempdir().unwrap();

    Command::cargo_bin("cloudsku")
        .unwrap()
        .args(["collect", "--limit", "10"])
        .arg("--pricing-url")
        .arg(format!("{url}/prices"))
        .arg("--catalog-url")
        .arg(format!("{url}/catalog-down"))
        .arg("--catalog-url")
        .arg(format!("{url}/catalog"))
        .arg("--out")
        .arg(out_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Pricing records: 3"))
        .stdout(predicate::str::contains("Catalog records: 2"))
        .stdout(predicate::str::contains("Benchmark records: 5"));

    catalog_down.assert();
    catalog_up.assert();

    let pricing_csv = fs::read_to_string(out_dir.path().join("azure_vms.csv")).unwrap();
    assert!(pricing_csv.contains("D2s_v3"));
    assert!(pricing_csv.contains("P3"));
    assert!(pricing_csv.contains("F4s_v2"));
    assert!(!pricing_csv.contains("X9_v2"));
    assert!(pricing_csv.contains("AMD"));

    let catalog_csv = fs::read_to_string(out_dir.path().join("aws_vms.csv")).unwrap();
    assert!(catalog_csv.contains("m5.large"));
    assert!(catalog_csv.contains("m6g.large"));
    assert!(catalog_csv.contains("Intel"));
    assert!(catalog_csv.contains("ARM"));

    let benchmark_csv = fs::read_to_string(out_dir.path().join("coremark_scores.csv")).unwrap();
    assert!(benchmark_csv.contains("AMD EPYC 7763"));
    assert!(benchmark_csv.contains("ARM Graviton3"));
}

#[test]
fn test_collect_with_all_sources_down_still_succeeds() {
    let mut server = Server::new();
    let url = server.url();

    let _pricing = server.mock("GET", "/prices").with_status(404).create();
    let _catalog = server.mock("GET", "/catalog").with_status(404).create();

    let out_dir = tempdir().unwrap();

    Command::cargo_bin("cloudsku")
        .unwrap()
        .arg("collect")
        .arg("--pricing-url")
        .arg(format!("{url}/prices"))
        .arg("--catalog-url")
        .arg(format!("{url}/catalog"))
        .arg("--out")
        .arg(out_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Pricing records: 0"))
        .stdout(predicate::str::contains("Catalog records: 0"))
        .stdout(predicate::str::contains("Benchmark records: 5"));

    // Only the built-in benchmark table is written.
    assert!(!out_dir.path().join("azure_vms.csv").exists());
    assert!(!out_dir.path().join("aws_vms.csv").exists());
    assert!(out_dir.path().join("coremark_scores.csv").exists());
}

#[test]
fn test_collect_limit_zero_writes_no_pricing() {
    let mut server = Server::new();
    let url = server.url();

    // Limit zero must not touch the pricing endpoint at all.
    let pricing = server.mock("GET", "/prices").expect(0).create();
    let _catalog = server
        .mock("GET", "/catalog")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"instance_type": "t3.micro", "processor": "Intel"}]"#)
        .create();

    let out_dir = tempdir().unwrap();

    Command::cargo_bin("cloudsku")
        .unwrap()
        .args(["collect", "--limit", "0"])
        .arg("--pricing-url")
        .arg(format!("{url}/prices"))
        .arg("--catalog-url")
        .arg(format!("{url}/catalog"))
        .arg("--out")
        .arg(out_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Pricing records: 0"))
        .stdout(predicate::str::contains("Catalog records: 1"));

    pricing.assert();
    assert!(!out_dir.path().join("azure_vms.csv").exists());
    assert!(out_dir.path().join("aws_vms.csv").exists());
}
