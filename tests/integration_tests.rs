use std::time::Duration;

use sshprobe::probe::{match_rules, BannerCapture, CapturedBanners, MatchSource, Prober};
use sshprobe::report::ProbeReport;
use sshprobe::rules::{compile_rules, EMBEDDED_RULES};

#[test]
fn test_embedded_rules_compile() {
    let rules = compile_rules(EMBEDDED_RULES).unwrap();
    assert!(!rules.is_empty());
}

#[test]
fn test_embedded_rules_identify_ubuntu_build() {
    let rules = compile_rules(EMBEDDED_RULES).unwrap();
    let m = match_rules(&rules, "SSH-2.0-OpenSSH_8.9p1 Ubuntu-3ubuntu0.6", "").unwrap();
    assert_eq!(m.rule.def.id, "ubuntu-2204");
    assert_eq!(m.rule.def.version.as_deref(), Some("22.04"));
    assert_eq!(m.source, MatchSource::Banner);
}

#[test]
fn test_embedded_rules_prefer_login_banner() {
    let rules = compile_rules(EMBEDDED_RULES).unwrap();
    // The protocol line says stock OpenSSH, the login banner names the
    // distro; the login rule should decide.
    let m = match_rules(
        &rules,
        "SSH-2.0-OpenSSH_8.7",
        "Welcome to this Rocky Linux 9 host.\nAuthorized users only.",
    )
    .unwrap();
    assert_eq!(m.rule.def.id, "rocky-login");
    assert_eq!(m.source, MatchSource::LoginBanner);
}

#[test]
fn test_embedded_rules_exact_centos7_line() {
    let rules = compile_rules(EMBEDDED_RULES).unwrap();
    let m = match_rules(&rules, "SSH-2.0-OpenSSH_7.4", "").unwrap();
    assert_eq!(m.rule.def.id, "centos-7");
}

#[test]
fn test_two_compilations_match_identically() {
    let first = compile_rules(EMBEDDED_RULES).unwrap();
    let second = compile_rules(EMBEDDED_RULES).unwrap();

    let corpus = [
        ("SSH-2.0-OpenSSH_8.9p1 Ubuntu-3ubuntu0.6", ""),
        ("SSH-2.0-OpenSSH_9.2p1 Debian-2+deb12u2", ""),
        ("SSH-2.0-dropbear_2022.83", ""),
        ("SSH-2.0-OpenSSH_8.7", "CentOS Stream release 9"),
        ("SSH-2.0-MysteryDaemon", "no clues here"),
        ("", ""),
    ];
    for (banner, login) in corpus {
        let a = match_rules(&first, banner, login).map(|m| (m.rule.def.id.clone(), m.source));
        let b = match_rules(&second, banner, login).map(|m| (m.rule.def.id.clone(), m.source));
        assert_eq!(a, b, "diverged on banner {banner:?} login {login:?}");
    }
}

#[test]
fn test_unmatched_banner_reports_unknown() {
    let rules = compile_rules(EMBEDDED_RULES).unwrap();
    let captured = CapturedBanners {
        banner: BannerCapture::Captured("SSH-2.0-MysteryDaemon".to_string()),
        login_banner: BannerCapture::Failed,
    };
    let outcome = match_rules(&rules, captured.banner.text(), captured.login_banner.text());
    let report = ProbeReport::assemble(outcome, &captured);
    assert_eq!(report.os, "Unknown");
    assert_eq!(report.source, "unknown");
    assert_eq!(report.banner, "SSH-2.0-MysteryDaemon");
    assert_eq!(report.login_banner, "");
}

#[tokio::test]
async fn test_probe_against_fake_ssh_server() {
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        // Serve the identification line twice: once for the protocol
        // banner read, once for the handshake attempt (which then
        // fails because we never continue the key exchange).
        for _ in 0..2 {
            let (mut socket, _) = listener.accept().await.unwrap();
            let _ = socket
                .write_all(b"SSH-2.0-OpenSSH_8.9p1 Ubuntu-3ubuntu0.6\r\n")
                .await;
        }
    });

    let rules = compile_rules(EMBEDDED_RULES).unwrap();
    let prober = Prober::new("127.0.0.1", port, Duration::from_millis(800));
    let report = prober.probe(&rules).await;

    // Protocol banner capture succeeds; the login handshake fails with
    // no banner, which degrades to an empty login_banner.
    assert_eq!(report.os, "Ubuntu Linux");
    assert_eq!(report.rule_id, "ubuntu-2204");
    assert_eq!(report.source, "banner");
    assert_eq!(report.banner, "SSH-2.0-OpenSSH_8.9p1 Ubuntu-3ubuntu0.6");
    assert_eq!(report.login_banner, "");
}

#[test]
fn test_output_writer_json_file() {
    use sshprobe::cli::OutputFormat;
    use sshprobe::report::OutputWriter;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");

    let captured = CapturedBanners {
        banner: BannerCapture::Captured("SSH-2.0-OpenSSH_7.4".to_string()),
        login_banner: BannerCapture::Captured(String::new()),
    };
    let rules = compile_rules(EMBEDDED_RULES).unwrap();
    let outcome = match_rules(&rules, captured.banner.text(), captured.login_banner.text());
    let report = ProbeReport::assemble(outcome, &captured);

    let writer = OutputWriter::new(OutputFormat::Json, Some(path.clone())).unwrap();
    writer.write(&report).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(value["os"], "CentOS Linux");
    assert_eq!(value["version"], "7");
    assert_eq!(value["rule_id"], "centos-7");
    assert_eq!(value["source"], "banner");
}
