use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::path::PathBuf;
use tfvc_bridge::error_translation::classifier;
use tfvc_bridge::tfvc::commands::{Add, Checkin, FindWorkspace, Undo};
use tfvc_bridge::tfvc::{ExecutionResult, TfvcCommand};

// Grouped output: a folder header followed by its files, repeated
fn grouped_output(folders: usize, files_per_folder: usize) -> String {
    let mut out = String::new();
    for f in 0..folders {
        out.push_str(&format!("/ws/project/folder{}:\n", f));
        for i in 0..files_per_folder {
            out.push_str(&format!("file{}.txt\n", i));
        }
        out.push('\n');
    }
    out
}

fn undo_output(files: usize) -> String {
    (0..files).map(|i| format!("Undoing edit: file{}.txt\n", i)).collect()
}

fn bench_add_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_parsing");
    let cmd = Add::new(None, vec![PathBuf::from("/ws/project")]);

    for (folders, files) in [(1, 10), (10, 10), (50, 40)] {
        let result = ExecutionResult::new(0, Some(&grouped_output(folders, files)), None);
        group.bench_with_input(
            BenchmarkId::new("files", folders * files),
            &result,
            |b, result| b.iter(|| cmd.parse_output(black_box(result))),
        );
    }

    group.finish();
}

fn bench_undo_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("undo_parsing");
    let cmd = Undo::all(None);

    for files in [10, 100, 2000] {
        let result = ExecutionResult::new(0, Some(&undo_output(files)), None);
        group.bench_with_input(BenchmarkId::new("files", files), &result, |b, result| {
            b.iter(|| cmd.parse_output(black_box(result)))
        });
    }

    // Exit 100 where every line is benign
    let benign: String = (0..100).map(|i| format!("No pending changes were found for file{}.txt\n", i)).collect();
    let result = ExecutionResult::new(100, Some(&benign), None);
    group.bench_with_input(BenchmarkId::new("benign_exit_100", 100), &result, |b, result| {
        b.iter(|| cmd.parse_output(black_box(result)))
    });

    group.finish();
}

fn bench_checkin_parsing(c: &mut Criterion) {
    let cmd = Checkin::new(None, vec![PathBuf::from("/ws/a.txt")]);
    let mut stdout = grouped_output(5, 20).replace("file", "Checking in edit: file");
    stdout.push_str("Changeset #4312 checked in.\n");
    let result = ExecutionResult::new(0, Some(&stdout), None);

    c.bench_function("checkin_changeset", |b| b.iter(|| cmd.parse_output(black_box(&result))));
}

fn bench_workfold_parsing(c: &mut Criterion) {
    let mut stdout = String::from(
        "===============================================================================\n\
         Workspace : ws1 (DOMAIN\\user1)\n\
         Collection: http://server:8080/tfs/collection1/\n",
    );
    for i in 0..50 {
        stdout.push_str(&format!("$/project/branch{}: /ws/branch{}\n", i, i));
    }
    stdout.push_str("(cloaked) $/project/branch0/bin:\n");
    let result = ExecutionResult::new(0, Some(&stdout), None);

    let unrestricted = FindWorkspace::new("/ws");
    let restricted = FindWorkspace::new("/ws/branch7").restrict_workspace(true);

    let mut group = c.benchmark_group("workfold_parsing");
    group.bench_function("all_mappings", |b| b.iter(|| unrestricted.parse_output(black_box(&result))));
    group.bench_function("restricted", |b| b.iter(|| restricted.parse_output(black_box(&result))));
    group.finish();
}

fn bench_classification(c: &mut Criterion) {
    let mut group = c.benchmark_group("classification");
    let failures = [
        ("auth", "TF30063: You are not authorized to access http://server:8080/tfs/collection1."),
        ("mappings", "There is no working folder mapping for /tmp/a.txt."),
        ("conflict", "A resolvable conflict was flagged by the server: No files checked in."),
        ("unknown", "Something unexpected happened while talking to the server."),
    ];

    for (label, stderr) in failures {
        let result = ExecutionResult::new(100, None, Some(stderr));
        group.bench_with_input(BenchmarkId::new("stderr", label), &result, |b, result| {
            b.iter(|| classifier::classify(black_box(result)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_add_parsing,
    bench_undo_parsing,
    bench_checkin_parsing,
    bench_workfold_parsing,
    bench_classification
);
criterion_main!(benches);
