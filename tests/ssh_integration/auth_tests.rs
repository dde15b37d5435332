//! Password capture tests

use std::collections::HashSet;

use super::fixtures::{Honeypot, try_passwords};

/// A single attempt is rejected and recorded in the documented format
#[tokio::test]
async fn test_password_is_captured_and_rejected() {
    let honeypot = Honeypot::start(&[0]).await;
    let addr = honeypot.addr();

    let accepted = try_passwords(addr, "root", &["toor123"]).await;
    assert!(!accepted, "No password may ever be accepted");

    let lines = honeypot.wait_for_lines(1).await;
    assert_eq!(
        lines,
        vec![format!("127.0.0.1#;#127.0.0.1#;#{}#;#root#;#toor123", addr.port())]
    );
}

/// Retries on one connection each produce a record, in order
#[tokio::test]
async fn test_retries_on_one_connection() {
    let honeypot = Honeypot::start(&[0]).await;

    let passwords = ["123456", "password", "admin", "letmein"];
    let accepted = try_passwords(honeypot.addr(), "admin", &passwords).await;
    assert!(!accepted);

    let lines = honeypot.wait_for_lines(passwords.len()).await;
    let captured: Vec<&str> = lines
        .iter()
        .map(|line| line.rsplit("#;#").next().unwrap())
        .collect();
    assert_eq!(captured, passwords);
}

/// Passwords containing the separator or unusual characters are kept verbatim
#[tokio::test]
async fn test_unusual_passwords_kept_verbatim() {
    let honeypot = Honeypot::start(&[0]).await;

    let accepted = try_passwords(honeypot.addr(), "oracle", &["p@ss word", "ünïcødé", ""]).await;
    assert!(!accepted);

    let lines = honeypot.wait_for_lines(3).await;
    assert!(lines[0].ends_with("#;#oracle#;#p@ss word"));
    assert!(lines[1].ends_with("#;#oracle#;#ünïcødé"));
    assert!(lines[2].ends_with("#;#oracle#;#"));
}

/// Many concurrent clients: exactly one intact line per attempt
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_attempts_are_all_recorded() {
    let honeypot = Honeypot::start(&[0]).await;
    let addr = honeypot.addr();

    let clients = 16;
    let attempts_per_client = 3;
    let mut tasks = Vec::new();
    for client in 0..clients {
        tasks.push(tokio::spawn(async move {
            let user = format!("user{}", client);
            let passwords: Vec<String> = (0..attempts_per_client)
                .map(|i| format!("secret-{}-{}", client, i))
                .collect();
            let refs: Vec<&str> = passwords.iter().map(String::as_str).collect();
            try_passwords(addr, &user, &refs).await
        }));
    }
    for task in tasks {
        assert!(!task.await.unwrap(), "No attempt may succeed");
    }

    let total = clients * attempts_per_client;
    let lines = honeypot.wait_for_lines(total).await;
    assert_eq!(lines.len(), total);

    let mut seen = HashSet::new();
    for line in &lines {
        let fields: Vec<&str> = line.split("#;#").collect();
        assert_eq!(fields.len(), 5, "corrupted line: {}", line);
        assert_eq!(fields[0], "127.0.0.1");
        assert_eq!(fields[2], addr.port().to_string());
        assert!(fields[4].starts_with(&format!("secret-{}-", &fields[3][4..])));
        assert!(seen.insert(fields[4].to_string()), "duplicate record: {}", line);
    }
}
