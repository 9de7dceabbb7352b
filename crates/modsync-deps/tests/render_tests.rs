use modsync_deps::{
    ModuleDescriptor, ModuleRef, ReconcileOptions, ReplaceDirective, Requirement, compare, parse,
    render_descriptor, render_suggestions,
};

#[test]
fn snapshot_rendered_descriptor() {
    let d = parse(
        "module example.com/plugin\n\
         go 1.14\n\
         require (\n\
         \texample.com/b v1.0.0 // indirect\n\
         \texample.com/a v1.0.0\n\
         )\n\
         replace example.com/b => ../b\n",
    )
    .unwrap();

    insta::assert_snapshot!(render_descriptor(&d), @r"
module example.com/plugin

go 1.14

require (
	example.com/a v1.0.0
	example.com/b v1.0.0 // indirect
)

replace (
	example.com/b => ../b
)
");
}

#[test]
fn snapshot_rendered_descriptor_without_tool_version() {
    let d = ModuleDescriptor::new("example.com/plugin")
        .with_replacement(ReplaceDirective::new(
            ModuleRef::new("example.com/a", "v1"),
            ModuleRef::new("example.com/a", "v2"),
        ));

    insta::assert_snapshot!(render_descriptor(&d), @r"
module example.com/plugin

replace (
	example.com/a v1 => example.com/a v2
)
");
}

#[test]
fn snapshot_require_suggestions() {
    let plugin = ModuleDescriptor::new("example.com/plugin")
        .with_requirement(Requirement::new("github.com/solo-io/bar", "v1.2.0"))
        .with_requirement(Requirement::new(
            "github.com/solo-io/foo",
            "v0.0.0-20170207000608-aaaaaaaaaaaa",
        ));
    let host = parse(
        "github.com/solo-io/solo-projects\n\
         github.com/solo-io/bar v1.2.3\n\
         github.com/solo-io/foo v0.0.0-20180207000608-0eeff89b0690\n",
    )
    .unwrap();

    let report = compare(&plugin, &host, &ReconcileOptions::default());
    let suggestions = render_suggestions(&report).unwrap();

    insta::assert_snapshot!(suggestions, @r"
require (
	// Add the following entries to the 'require' section of your module file:
	github.com/solo-io/bar v1.2.3
	github.com/solo-io/foo v0.0.0-20180207000608-0eeff89b0690
)
");
}

#[test]
fn snapshot_mixed_suggestions() {
    let plugin = parse(
        "module example.com/plugin\n\
         require (\n\
         \texample.com/a v1\n\
         \texample.com/b v1\n\
         \texample.com/c v1\n\
         )\n",
    )
    .unwrap();
    let host = parse(
        "example.com/host\n\
         example.com/a v2\n\
         example.com/b v1 => example.com/b v2\n\
         example.com/c v1 => example.com/x v1\n",
    )
    .unwrap();

    let report = compare(&plugin, &host, &ReconcileOptions::default());
    let suggestions = render_suggestions(&report).unwrap();

    insta::assert_snapshot!(suggestions, @r"
require (
	// Add the following entries to the 'require' section of your module file:
	example.com/a v2
)

replace (
	// Add the following entries to the 'replace' section of your module file:
	example.com/b v1 => example.com/b v2
	example.com/c v1 => example.com/x v1
)
");
}

#[test]
fn test_no_suggestions_when_reconciled() {
    let plugin = parse("module p\nrequire a v1\n").unwrap();
    let host = parse("host\na v1\n").unwrap();

    let report = compare(&plugin, &host, &ReconcileOptions::default());
    assert!(render_suggestions(&report).is_none());
}
