//! test_utils 的集成测试
//!
//! 载荷构造的字段命名、断言工具的失败信息、生成器的唯一性。

use rewards_shared::test_utils::*;
use serde_json::json;

// ==================== 载荷构造 ====================

#[test]
fn test_place_order_payload_single_line() {
    let payload = TestDataGenerator::place_order_payload(3, &[(101, 60)]);

    assert_eq!(payload["dealerId"], 3);
    let products = payload["products"].as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["productId"], 101);
    assert_eq!(products[0]["quantity"], 60);
}

#[test]
fn test_place_order_payload_multiple_lines() {
    let payload = TestDataGenerator::place_order_payload(7, &[(101, 60), (102, 5), (103, 1)]);

    let products = payload["products"].as_array().unwrap();
    assert_eq!(products.len(), 3);
    assert_eq!(products[1]["productId"], 102);
    assert_eq!(products[1]["quantity"], 5);
    assert_eq!(products[2]["quantity"], 1);
}

#[test]
fn test_place_order_payload_uses_camel_case_keys() {
    // 请求载荷字段使用 camelCase，与 API 的序列化约定一致
    let payload = TestDataGenerator::place_order_payload(1, &[(5, 10)]);

    TestAssertions::assert_json_has_field(&payload, "dealerId");
    assert!(payload.get("dealer_id").is_none());
    assert!(payload["products"][0].get("product_id").is_none());
}

#[test]
fn test_register_payload_generation() {
    let payload = TestDataGenerator::register_payload("Ravi Kumar", "ravi@example.com");

    assert_eq!(payload["name"], "Ravi Kumar");
    assert_eq!(payload["email"], "ravi@example.com");
    TestAssertions::assert_json_has_field(&payload, "password");
    TestAssertions::assert_json_has_field(&payload, "mobileNo");
}

#[test]
fn test_login_payload_generation() {
    let payload = TestDataGenerator::login_payload("ravi@example.com", "secret123");

    assert_eq!(payload["email"], "ravi@example.com");
    assert_eq!(payload["password"], "secret123");
}

// ==================== 断言工具 ====================

#[test]
fn test_assert_json_field_eq_success() {
    let json1 = json!({"name": "test", "value": 42});
    let json2 = json!({"name": "test", "other": 100});

    TestAssertions::assert_json_field_eq(&json1, &json2, "name");
}

#[test]
#[should_panic(expected = "Field 'value' mismatch")]
fn test_assert_json_field_eq_failure() {
    let json1 = json!({"value": 42});
    let json2 = json!({"value": 100});

    TestAssertions::assert_json_field_eq(&json1, &json2, "value");
}

#[test]
fn test_assert_json_has_field_success() {
    let json = json!({"name": "test", "nested": {"key": "value"}});

    TestAssertions::assert_json_has_field(&json, "name");
    TestAssertions::assert_json_has_field(&json, "nested");
}

#[test]
#[should_panic(expected = "Expected JSON to have field")]
fn test_assert_json_has_field_failure() {
    let json = json!({"name": "test"});

    TestAssertions::assert_json_has_field(&json, "missing");
}

#[test]
fn test_assert_time_within_success() {
    use chrono::{Duration, Utc};

    let now = Utc::now();
    let close_time = now + Duration::milliseconds(500);

    TestAssertions::assert_time_within(now, close_time, Duration::seconds(1));
}

#[test]
#[should_panic(expected = "Time difference")]
fn test_assert_time_within_failure() {
    use chrono::{Duration, Utc};

    let now = Utc::now();
    let far_time = now + Duration::hours(1);

    TestAssertions::assert_time_within(now, far_time, Duration::seconds(1));
}

// ==================== 生成器唯一性与配置 ====================

#[test]
fn test_user_id_uniqueness() {
    let ids: Vec<i64> = (0..100).map(|_| test_user_id()).collect();
    let unique_count = ids.iter().collect::<std::collections::HashSet<_>>().len();

    assert_eq!(unique_count, 100, "用户 ID 出现重复");
}

#[test]
fn test_email_uniqueness() {
    let emails: Vec<String> = (0..100).map(|_| test_email()).collect();
    let unique_count = emails
        .iter()
        .collect::<std::collections::HashSet<_>>()
        .len();

    assert_eq!(unique_count, 100);
    assert!(emails.iter().all(|e| e.ends_with("@example.com")));
}

#[test]
fn test_batch_id_uniqueness() {
    let id1 = test_batch_id();
    let id2 = test_batch_id();

    assert_ne!(id1, id2);
}

#[test]
fn test_database_config_creation() {
    let config = test_database_config();

    assert!(config.url.contains("postgres://"));
    assert!(config.max_connections > 0);
    assert!(config.connect_timeout_seconds > 0);
}

#[test]
fn test_redis_config_creation() {
    let config = test_redis_config();

    assert!(config.url.contains("redis://"));
    assert!(config.pool_size > 0);
}
