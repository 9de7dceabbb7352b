use modsync_deps::{
    MismatchKind, ModuleDescriptor, ModuleRef, ReconcileOptions, ReplaceDirective, Report,
    Requirement, compare, merge_with_options, parse, render_descriptor,
};
use proptest::prelude::*;
use std::collections::HashMap;

const MODULES: [&str; 4] = ["example.com/a", "example.com/b", "example.com/c", "example.com/d"];

fn version() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["v1.0.0", "v1.1.0", "v2.0.0"]).prop_map(String::from)
}

fn target() -> impl Strategy<Value = ModuleRef> {
    let path = prop::sample::select(vec!["example.com/a", "example.com/fork", "../local"]);
    (path, prop::option::of(version())).prop_map(|(path, version)| ModuleRef {
        path: path.to_string(),
        version,
    })
}

/// What a descriptor declares for one module.
#[derive(Debug, Clone)]
struct Entry {
    requirement: Option<String>,
    replacement: Option<(Option<String>, ModuleRef)>,
}

fn entry() -> impl Strategy<Value = Entry> {
    (
        prop::option::of(version()),
        prop::option::of((prop::option::of(version()), target())),
    )
        .prop_map(|(requirement, replacement)| Entry {
            requirement,
            replacement,
        })
}

fn descriptor(name: &'static str) -> impl Strategy<Value = ModuleDescriptor> {
    (
        prop::option::of(version()),
        prop::collection::vec(entry(), MODULES.len()),
    )
        .prop_map(move |(tool_version, entries)| {
            let mut d = ModuleDescriptor::new(name);
            d.tool_version = tool_version;
            for (module, entry) in MODULES.iter().zip(entries) {
                if let Some(v) = entry.requirement {
                    d = d.with_requirement(Requirement::new(*module, v));
                }
                if let Some((old_version, new)) = entry.replacement {
                    let old = ModuleRef {
                        path: module.to_string(),
                        version: old_version,
                    };
                    d = d.with_replacement(ReplaceDirective::new(old, new));
                }
            }
            d
        })
}

fn options() -> impl Strategy<Value = ReconcileOptions> {
    any::<bool>().prop_map(|allow| ReconcileOptions::default().allowing_host_only_replacements(allow))
}

proptest! {
    #[test]
    fn test_merge_is_idempotent(
        plugin in descriptor("example.com/plugin"),
        host in descriptor("example.com/host"),
        options in options(),
    ) {
        let once = merge_with_options(&plugin, &host, &options);
        let twice = merge_with_options(&once, &host, &options);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn test_clean_comparison_means_noop_merge(
        plugin in descriptor("example.com/plugin"),
        host in descriptor("example.com/host"),
        options in options(),
    ) {
        if compare(&plugin, &host, &options).is_empty() {
            prop_assert_eq!(merge_with_options(&plugin, &host, &options), plugin);
        }
    }

    #[test]
    fn test_merge_keeps_plugin_identity(
        plugin in descriptor("example.com/plugin"),
        host in descriptor("example.com/host"),
        options in options(),
    ) {
        let merged = merge_with_options(&plugin, &host, &options);
        prop_assert_eq!(&merged.name, &plugin.name);
        prop_assert_eq!(&merged.tool_version, &plugin.tool_version);
    }

    #[test]
    fn test_rendered_merge_parses_back(
        plugin in prop_oneof![descriptor("example.com/plugin"), descriptor("")],
        host in descriptor("example.com/host"),
        options in options(),
    ) {
        let merged = merge_with_options(&plugin, &host, &options);
        let reparsed = parse(&render_descriptor(&merged)).unwrap();
        prop_assert_eq!(reparsed, merged);
    }

    #[test]
    fn test_identical_requirements_are_never_reported(
        module in prop::sample::select(MODULES.to_vec()),
        v in version(),
    ) {
        let plugin = ModuleDescriptor::new("example.com/plugin")
            .with_requirement(Requirement::new(module, v.clone()));
        let host = ModuleDescriptor::new("example.com/host")
            .with_requirement(Requirement::new(module, v));
        prop_assert!(compare(&plugin, &host, &ReconcileOptions::default()).is_empty());
    }

    #[test]
    fn test_report_keeps_first_entry_per_module(
        adds in prop::collection::vec((0..MODULES.len(), 0..1000u32), 0..32),
    ) {
        let mut report = Report::new();
        let mut first: HashMap<&str, String> = HashMap::new();

        for (idx, tag) in adds {
            let module = MODULES[idx];
            let message = format!("message {tag}");
            report.add_entry(MismatchKind::RequireVersionMismatch, module, message.clone());
            first.entry(module).or_insert(message);
        }

        prop_assert_eq!(report.len(), first.len());
        for (module, message) in first {
            prop_assert_eq!(&report.get_entry(module).unwrap().message, &message);
        }
    }
}
