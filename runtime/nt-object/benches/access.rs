//! Benchmarks for rights translation, timeout composition and polling waits

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use nt_object::*;

fn translation(c: &mut Criterion) {
    use nt_object::kinds::{DirectoryKind, EventKind};

    c.bench_function("translate_generic_read_event", |b| {
        b.iter(|| EventKind::translate(black_box(AccessMask::GENERIC_READ)))
    });
    c.bench_function("translate_mixed_directory", |b| {
        let mask = AccessMask::GENERIC_WRITE | AccessMask::SYNCHRONIZE | AccessMask::from_raw(0x0001);
        b.iter(|| DirectoryKind::translate(black_box(mask)))
    });
}

fn composition(c: &mut Criterion) {
    c.bench_function("compose_timeout", |b| {
        let parts = TimeoutParts { hours: 1, minutes: 2, seconds: 3, milliseconds: 4, infinite: false };
        b.iter(|| black_box(parts).compose())
    });
}

fn polling(c: &mut Criterion) {
    let idle = Event::create(
        &ObjectAttributes::new(),
        EventAccessRights::GENERIC_ALL,
        EventType::Notification,
        false,
        true,
    )
    .and_then(NtResult::into_result)
    .expect("Failed to create event");
    let ready = Event::create(
        &ObjectAttributes::new(),
        EventAccessRights::GENERIC_ALL,
        EventType::Notification,
        true,
        true,
    )
    .and_then(NtResult::into_result)
    .expect("Failed to create event");

    c.bench_function("wait_one_poll", |b| {
        b.iter(|| wait_one(&idle, false, WaitTimeout::ZERO, false))
    });
    c.bench_function("wait_many_any_poll", |b| {
        b.iter(|| wait_many(&[&idle, &ready], false, false, WaitTimeout::ZERO, false))
    });
}

criterion_group!(benches, translation, composition, polling);
criterion_main!(benches);
