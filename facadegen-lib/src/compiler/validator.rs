use super::resolver::Descriptor;
use super::{BucketConflict, BucketPolicy, ErrorKind, FACADE_TYPE_NAME, ValidationError, escaped_ident, label_param_name};
use crate::decl::{BucketKind, BucketSpec};
use heck::ToSnakeCase;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

const LOG_TARGET: &str = " validator";

static NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]*$").expect("invalid regex"));
static LABEL_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("invalid regex"));
/// Methods every facade defines, which no accessor may shadow
const RESERVED_MEMBERS: &[&str] = &["create", "create_with_registry"];

/// Type names generated code refers to unqualified, which no module may shadow
const RESERVED_MODULES: &[&str] = &[FACADE_TYPE_NAME, "Box", "str"];

static IDENTIFIER_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^_*[A-Za-z][A-Za-z0-9_]*$").expect("invalid regex"));

/// Check every rule against the full descriptor set
///
/// All violations are collected rather than stopping at the first one. The order of the
/// returned errors depends only on the input order.
pub fn validate(descriptors: &[Descriptor<'_>], policy: BucketPolicy) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_names(descriptors, &mut errors);
    check_name_uniqueness(descriptors, &mut errors);
    check_labels(descriptors, &mut errors);
    check_identifiers(descriptors, &mut errors);
    check_members(descriptors, &mut errors);
    check_modules(descriptors, &mut errors);
    check_buckets(descriptors, policy, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        log::debug!(target: LOG_TARGET, "Found {} violations in {} declarations", errors.len(), descriptors.len());
        Err(errors)
    }
}

fn check_names(descriptors: &[Descriptor<'_>], errors: &mut Vec<ValidationError>) {
    for d in descriptors {
        let name = &d.resolved.prom_name;
        if name.is_empty() || !NAME_REGEX.is_match(name) {
            errors.push(ValidationError::new(ErrorKind::IllegalName { name: name.clone() }, vec![d.resolved.site.clone()]));
        }
    }
}

fn check_name_uniqueness(descriptors: &[Descriptor<'_>], errors: &mut Vec<ValidationError>) {
    for (name, sites) in collect_sites(descriptors.iter().map(|d| (d.resolved.prom_name.clone(), &d.resolved.site))) {
        if sites.len() > 1 {
            errors.push(ValidationError::new(ErrorKind::DuplicateName { name, count: sites.len() }, sites));
        }
    }
}

fn check_labels(descriptors: &[Descriptor<'_>], errors: &mut Vec<ValidationError>) {
    for d in descriptors {
        let metric = &d.resolved.prom_name;
        let site = &d.resolved.site;
        let mut seen = BTreeSet::new();
        let mut reported = BTreeSet::new();
        let mut params: BTreeMap<String, &str> = BTreeMap::new();

        for (index, label) in d.resolved.labels.iter().enumerate() {
            if !LABEL_REGEX.is_match(label) || label.starts_with("__") {
                errors.push(ValidationError::new(
                    ErrorKind::IllegalLabel {
                        metric: metric.clone(),
                        label: label.clone(),
                    },
                    vec![site.clone()],
                ));
            }

            if !seen.insert(label.as_str()) && reported.insert(label.as_str()) {
                errors.push(ValidationError::new(
                    ErrorKind::DuplicateLabel {
                        metric: metric.clone(),
                        label: label.clone(),
                    },
                    vec![site.clone()],
                ));
            }

            // distinct labels may still map to the same accessor parameter
            let param = label_param_name(label, index);
            match params.get(param.as_str()) {
                Some(first) if *first != label.as_str() => errors.push(ValidationError::new(
                    ErrorKind::DuplicateLabel {
                        metric: metric.clone(),
                        label: param,
                    },
                    vec![site.clone()],
                )),
                Some(_) => {}
                None => {
                    let _ = params.insert(param, label.as_str());
                }
            }
        }
    }
}

/// Source identifiers and namespace segments must be usable as Rust identifiers
fn check_identifiers(descriptors: &[Descriptor<'_>], errors: &mut Vec<ValidationError>) {
    let candidates = descriptors.iter().flat_map(|d| {
        d.declaration
            .namespace
            .split("::")
            .chain(core::iter::once(d.declaration.source_identifier.as_str()))
            .map(move |identifier| (identifier.to_string(), &d.resolved.site))
    });

    for (identifier, mut sites) in collect_sites(candidates) {
        // a namespace like `a::a` yields the same segment twice for one site
        sites.dedup();
        if !IDENTIFIER_REGEX.is_match(&identifier) {
            errors.push(ValidationError::new(ErrorKind::IllegalIdentifier { identifier }, sites));
        }
    }
}

/// Accessors and fields are emitted in snake case, so distinct source identifiers in one
/// namespace may still collide once converted
fn check_members(descriptors: &[Descriptor<'_>], errors: &mut Vec<ValidationError>) {
    let accessors = collect_sites(descriptors.iter().map(|d| {
        (
            format!("{}::{}", d.resolved.namespace, escaped_ident(&d.resolved.accessor_name.to_snake_case())),
            &d.resolved.site,
        )
    }));
    let fields = collect_sites(descriptors.iter().map(|d| {
        (
            format!("{}::{}", d.resolved.namespace, escaped_ident(&d.resolved.field_name.to_snake_case())),
            &d.resolved.site,
        )
    }));

    let mut reported: BTreeSet<Vec<String>> = BTreeSet::new();
    for (key, sites) in accessors.into_iter().chain(fields) {
        let (namespace, member) = key.rsplit_once("::").unwrap_or(("", key.as_str()));
        let reserved = RESERVED_MEMBERS.contains(&member);
        if (sites.len() < 2 && !reserved) || !reported.insert(sites.clone()) {
            continue;
        }

        errors.push(ValidationError::new(
            ErrorKind::DuplicateMember {
                namespace: namespace.to_string(),
                member: member.to_string(),
            },
            sites,
        ));
    }
}

/// Namespace segments become nested modules, which must stay distinct once escaped and
/// must not shadow the types generated code names without a path
fn check_modules(descriptors: &[Descriptor<'_>], errors: &mut Vec<ValidationError>) {
    let mut modules: BTreeMap<(String, String), (BTreeSet<&str>, Vec<String>)> = BTreeMap::new();

    for d in descriptors {
        let segments: Vec<&str> = d.declaration.namespace.split("::").collect();
        for (depth, segment) in segments.iter().enumerate() {
            let parent = segments.get(..depth).map_or_else(String::new, |parents| parents.join("::"));
            let (spellings, sites) = modules.entry((parent, escaped_ident(segment))).or_default();
            let _ = spellings.insert(*segment);
            if !sites.contains(&d.resolved.site) {
                sites.push(d.resolved.site.clone());
            }
        }
    }

    let mut reserved: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for ((parent, module), (spellings, sites)) in modules {
        if RESERVED_MODULES.contains(&module.as_str()) {
            let all = reserved.entry(module).or_default();
            for site in sites {
                if !all.contains(&site) {
                    all.push(site);
                }
            }
        } else if spellings.len() > 1 {
            let namespace = if parent.is_empty() { "crate".to_string() } else { parent };
            errors.push(ValidationError::new(ErrorKind::DuplicateMember { namespace, member: module }, sites));
        }
    }

    for (identifier, sites) in reserved {
        errors.push(ValidationError::new(ErrorKind::IllegalIdentifier { identifier }, sites));
    }
}

fn check_buckets(descriptors: &[Descriptor<'_>], policy: BucketPolicy, errors: &mut Vec<ValidationError>) {
    for d in descriptors {
        let metric = &d.resolved.prom_name;
        let site = &d.resolved.site;
        let metric_type = d.declaration.metric_type;

        let mut kinds: Vec<BucketKind> = d
            .declaration
            .bucket_specs
            .iter()
            .map(BucketSpec::kind)
            .filter(|kind| *kind != BucketKind::Default)
            .collect();
        kinds.sort();

        if !metric_type.is_histogram() {
            if kinds.is_empty() {
                continue;
            }

            match policy {
                BucketPolicy::Strict => errors.push(ValidationError::new(
                    ErrorKind::InconsistentBucketAnnotation {
                        metric: metric.clone(),
                        conflict: BucketConflict::NotAHistogram(metric_type),
                    },
                    vec![site.clone()],
                )),
                BucketPolicy::Lenient => {
                    log::warn!(target: LOG_TARGET, "Ignoring bucket annotations on {metric_type} '{metric}' declared at {site}");
                }
            }

            continue;
        }

        if kinds.len() > 1 {
            match policy {
                BucketPolicy::Strict => {
                    errors.push(ValidationError::new(
                        ErrorKind::InconsistentBucketAnnotation {
                            metric: metric.clone(),
                            conflict: BucketConflict::MultipleKinds(kinds),
                        },
                        vec![site.clone()],
                    ));
                    continue;
                }
                BucketPolicy::Lenient => {
                    log::warn!(target: LOG_TARGET, "Histogram '{metric}' declared at {site} has several bucket annotations, applying {}", kinds[0]);
                }
            }
        }

        if let Some(reason) = d.resolved.buckets.as_ref().and_then(BucketSpec::problem) {
            errors.push(ValidationError::new(
                ErrorKind::InvalidBuckets {
                    metric: metric.clone(),
                    reason,
                },
                vec![site.clone()],
            ));
        }
    }
}

/// Group sites by key, keeping keys sorted and sites in encounter order
fn collect_sites<'a>(entries: impl Iterator<Item = (String, &'a String)>) -> BTreeMap<String, Vec<String>> {
    let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (key, site) in entries {
        map.entry(key).or_default().push(site.clone());
    }

    map
}

#[cfg(test)]
mod tests {
    use super::super::resolver::resolve;
    use super::*;
    use crate::decl::{MetricDeclaration, MetricType};

    fn run(decls: &[MetricDeclaration], policy: BucketPolicy) -> Vec<ValidationError> {
        let descriptors: Vec<_> = decls.iter().map(resolve).collect();
        validate(&descriptors, policy).err().unwrap_or_default()
    }

    fn kinds(decls: &[MetricDeclaration]) -> Vec<ErrorKind> {
        run(decls, BucketPolicy::Strict).into_iter().map(|e| e.kind).collect()
    }

    fn counter(namespace: &str, ident: &str) -> MetricDeclaration {
        MetricDeclaration::new(namespace, ident, MetricType::Counter)
    }

    #[test]
    fn test_valid_set_passes() {
        let decls = [
            counter("sample", "Error").with_labels(["label1", "label2"]),
            MetricDeclaration::new("sample", "Timing", MetricType::Histogram)
                .with_name("testHisto")
                .with_buckets(BucketSpec::Exponential {
                    start: 1.0,
                    factor: 2.0,
                    count: 16,
                }),
            MetricDeclaration::new("sample", "NumThreads", MetricType::Gauge).with_name("testGauge"),
        ];

        assert!(run(&decls, BucketPolicy::Strict).is_empty());
    }

    #[test]
    fn test_illegal_names() {
        let decls = [counter("sample", "A").with_name("bad-name"), counter("sample", "B").with_name("  ")];

        assert_eq!(
            kinds(&decls),
            [
                ErrorKind::IllegalName {
                    name: "bad-name".to_string()
                },
                ErrorKind::IllegalName { name: String::new() },
            ]
        );
    }

    #[test]
    fn test_name_charset_is_ascii_only() {
        let decls = [counter("sample", "A").with_name("größe")];
        assert_eq!(kinds(&decls).len(), 1);

        let decls = [counter("sample", "A").with_name("9_lives_")];
        assert!(kinds(&decls).is_empty());
    }

    #[test]
    fn test_duplicates_across_namespaces() {
        let decls = [
            counter("a", "Requests"),
            counter("b", "Other").with_name("Requests"),
            counter("c", "Requests"),
        ];

        let errors = run(&decls, BucketPolicy::Strict);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].kind,
            ErrorKind::DuplicateName {
                name: "Requests".to_string(),
                count: 3
            }
        );
        assert_eq!(errors[0].sites, ["a::Requests", "b::Other", "c::Requests"]);
    }

    #[test]
    fn test_labels() {
        let decls = [counter("sample", "Error").with_labels(["ok", "1st", "__reserved", "ok", "ok", "with space"])];

        assert_eq!(
            kinds(&decls),
            [
                ErrorKind::IllegalLabel {
                    metric: "Error".to_string(),
                    label: "1st".to_string()
                },
                ErrorKind::IllegalLabel {
                    metric: "Error".to_string(),
                    label: "__reserved".to_string()
                },
                ErrorKind::DuplicateLabel {
                    metric: "Error".to_string(),
                    label: "ok".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_blank_names_are_also_duplicates() {
        let decls = [counter("sample", "A").with_name(" "), counter("sample", "B").with_name("\t")];

        assert_eq!(
            kinds(&decls),
            [
                ErrorKind::IllegalName { name: String::new() },
                ErrorKind::IllegalName { name: String::new() },
                ErrorKind::DuplicateName {
                    name: String::new(),
                    count: 2
                },
            ]
        );
    }

    #[test]
    fn test_labels_colliding_as_parameters() {
        let decls = [
            counter("sample", "A").with_name("a").with_labels(["self", "self_"]),
            counter("sample", "B").with_name("b").with_labels(["_", "label_0"]),
            counter("sample", "C").with_name("c").with_labels(["_", "label_1"]),
        ];

        assert_eq!(
            kinds(&decls),
            [
                ErrorKind::DuplicateLabel {
                    metric: "a".to_string(),
                    label: "self_".to_string()
                },
                ErrorKind::DuplicateLabel {
                    metric: "b".to_string(),
                    label: "label_0".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_escaped_module_collision() {
        let decls = [counter("a::self", "X").with_name("x"), counter("a::self_", "Y").with_name("y")];

        let errors = run(&decls, BucketPolicy::Strict);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].kind,
            ErrorKind::DuplicateMember {
                namespace: "a".to_string(),
                member: "self_".to_string()
            }
        );
        assert_eq!(errors[0].sites, ["a::self::X", "a::self_::Y"]);
    }

    #[test]
    fn test_top_level_module_collision() {
        let decls = [counter("crate", "X").with_name("x"), counter("crate_", "Y").with_name("y")];

        assert_eq!(
            kinds(&decls),
            [ErrorKind::DuplicateMember {
                namespace: "crate".to_string(),
                member: "crate_".to_string()
            }]
        );
    }

    #[test]
    fn test_modules_cannot_shadow_generated_types() {
        let decls = [
            counter("b::Metrics", "X").with_name("x"),
            counter("c::Box", "Y").with_name("y"),
            counter("Box", "Z").with_name("z"),
            counter("d::str::e", "W").with_name("w"),
        ];

        assert_eq!(
            kinds(&decls),
            [
                ErrorKind::IllegalIdentifier {
                    identifier: "Box".to_string()
                },
                ErrorKind::IllegalIdentifier {
                    identifier: "Metrics".to_string()
                },
                ErrorKind::IllegalIdentifier {
                    identifier: "str".to_string()
                },
            ]
        );

        let errors = run(&decls, BucketPolicy::Strict);
        assert_eq!(errors[0].sites, ["Box::Z", "c::Box::Y"]);
    }

    #[test]
    fn test_escaped_accessor_collision() {
        let decls = [counter("sample", "self").with_name("x"), counter("sample", "self_").with_name("y")];

        assert_eq!(
            kinds(&decls),
            [ErrorKind::DuplicateMember {
                namespace: "sample".to_string(),
                member: "self_".to_string()
            }]
        );
    }

    #[test]
    fn test_overflowing_ladder_is_rejected() {
        let decls = [MetricDeclaration::new("sample", "Timing", MetricType::Histogram).with_buckets(BucketSpec::Exponential {
            start: 1.0,
            factor: 10.0,
            count: 400,
        })];

        assert_eq!(
            kinds(&decls),
            [ErrorKind::InvalidBuckets {
                metric: "Timing".to_string(),
                reason: "bucket bound inf is not finite".to_string(),
            }]
        );
    }

    #[test]
    fn test_identifiers() {
        let decls = [counter("sample::9bad", "Fine").with_name("a"), counter("sample", "_").with_name("b")];

        let errors = run(&decls, BucketPolicy::Strict);
        let identifiers: Vec<_> = errors
            .iter()
            .filter_map(|e| match &e.kind {
                ErrorKind::IllegalIdentifier { identifier } => Some(identifier.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(identifiers, ["9bad", "_"]);
    }

    #[test]
    fn test_snake_case_member_collision() {
        let decls = [counter("sample", "FooBar").with_name("a"), counter("sample", "fooBar").with_name("b")];

        let errors = run(&decls, BucketPolicy::Strict);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].kind,
            ErrorKind::DuplicateMember {
                namespace: "sample".to_string(),
                member: "foo_bar".to_string()
            }
        );
        assert_eq!(errors[0].sites, ["sample::FooBar", "sample::fooBar"]);
    }

    #[test]
    fn test_identical_declarations_are_duplicates() {
        let decls = [counter("a", "Requests"), counter("a", "Requests")];

        let errors = run(&decls, BucketPolicy::Strict);
        assert_eq!(
            errors[0].kind,
            ErrorKind::DuplicateName {
                name: "Requests".to_string(),
                count: 2
            }
        );
    }

    #[test]
    fn test_accessor_cannot_shadow_constructor() {
        let decls = [counter("sample", "Create")];

        assert_eq!(
            kinds(&decls),
            [ErrorKind::DuplicateMember {
                namespace: "sample".to_string(),
                member: "create".to_string()
            }]
        );
    }

    #[test]
    fn test_same_identifier_different_namespaces_is_fine() {
        let decls = [counter("a", "Requests").with_name("a_requests"), counter("b", "Requests").with_name("b_requests")];
        assert!(kinds(&decls).is_empty());
    }

    #[test]
    fn test_strict_rejects_buckets_on_counter() {
        let decls = [counter("sample", "Error").with_buckets(BucketSpec::Explicit { values: vec![1.0] })];

        assert_eq!(
            kinds(&decls),
            [ErrorKind::InconsistentBucketAnnotation {
                metric: "Error".to_string(),
                conflict: BucketConflict::NotAHistogram(MetricType::Counter),
            }]
        );
    }

    #[test]
    fn test_strict_rejects_multiple_kinds() {
        let decls = [MetricDeclaration::new("sample", "Timing", MetricType::Histogram)
            .with_buckets(BucketSpec::Linear {
                start: 0.0,
                width: 1.0,
                count: 3,
            })
            .with_buckets(BucketSpec::Explicit { values: vec![1.0] })];

        assert_eq!(
            kinds(&decls),
            [ErrorKind::InconsistentBucketAnnotation {
                metric: "Timing".to_string(),
                conflict: BucketConflict::MultipleKinds(vec![BucketKind::Explicit, BucketKind::Linear]),
            }]
        );
    }

    #[test]
    fn test_lenient_accepts_conflicts() {
        let decls = [
            counter("sample", "Error").with_buckets(BucketSpec::Explicit { values: vec![1.0] }),
            MetricDeclaration::new("sample", "Timing", MetricType::Histogram)
                .with_buckets(BucketSpec::Linear {
                    start: 0.0,
                    width: 1.0,
                    count: 3,
                })
                .with_buckets(BucketSpec::Explicit { values: vec![1.0, 2.0] }),
        ];

        assert!(run(&decls, BucketPolicy::Lenient).is_empty());
    }

    #[test]
    fn test_invalid_applied_buckets() {
        let decls = [MetricDeclaration::new("sample", "Timing", MetricType::Histogram).with_buckets(BucketSpec::Explicit {
            values: vec![2.0, 1.0],
        })];

        assert_eq!(
            kinds(&decls),
            [ErrorKind::InvalidBuckets {
                metric: "Timing".to_string(),
                reason: "bucket bounds must be strictly increasing, but 2 is followed by 1".to_string(),
            }]
        );
    }

    #[test]
    fn test_order_is_deterministic() {
        let decls = [
            counter("b", "X").with_name("dup"),
            counter("a", "Y").with_name("bad-name"),
            counter("a", "Z").with_name("dup"),
        ];

        let first = run(&decls, BucketPolicy::Strict);
        let second = run(&decls, BucketPolicy::Strict);
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }
}
