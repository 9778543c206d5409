use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_mask_allows() {
    let mask = SeverityMask::ALL_ERRORS;
    assert!(mask.allows(Severity::Exception));
    assert!(mask.allows(Severity::UserError));
    assert!(!mask.allows(Severity::Notice));
    assert!(SeverityMask::all().allows(Severity::Deprecated));
    assert!(!SeverityMask::empty().allows(Severity::Error));
}

#[test]
fn test_from_names() {
    let mask = SeverityMask::from_names(&["warnings", "notice"]).unwrap_or_default();
    assert!(mask.allows(Severity::CoreWarning));
    assert!(mask.allows(Severity::Notice));
    assert!(!mask.allows(Severity::UserNotice));
    assert!(!mask.allows(Severity::Error));
}

#[test]
fn test_from_names_rejects_unknown() {
    assert_eq!(
        SeverityMask::from_names(&["errors", "fatal"]),
        Err(UnknownSeverity("fatal".into()))
    );
}

#[test]
fn test_severity_parse_round_trip() {
    for sev in ALL_SEVERITIES {
        assert_eq!(sev.as_str().parse::<Severity>(), Ok(sev));
    }
    assert_eq!("USER_ERROR".parse::<Severity>(), Ok(Severity::UserError));
}

#[test]
fn test_each_severity_has_one_distinct_bit() {
    let mut seen = SeverityMask::empty();
    for sev in ALL_SEVERITIES {
        let flag = sev.flag();
        assert_eq!(flag.bits().count_ones(), 1);
        assert!(!seen.intersects(flag));
        seen |= flag;
    }
    assert_eq!(seen, SeverityMask::all());
}
