use std::hint::black_box;

use chrono::{Duration, TimeZone, Utc};
use conflict_engine::{
    detect, Commitment, ConflictQuery, MeetingId, Participant, ParticipantId, TimeInterval,
};
use criterion::{criterion_group, criterion_main, Criterion};

/// A week of 30-minute meetings for `participants` people, one every 45 minutes.
fn workload(participants: usize, per_participant: usize) -> (ConflictQuery, Vec<Commitment>) {
    let base = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();

    let people: Vec<Participant> = (0..participants)
        .map(|p| {
            Participant::new(
                format!("p{p}"),
                format!("Person {p}"),
                format!("p{p}@example.com"),
            )
        })
        .collect();

    let mut commitments = Vec::with_capacity(participants * per_participant);
    for p in 0..participants {
        for n in 0..per_participant {
            let start = base + Duration::minutes((n as i64) * 45 + (p as i64) * 5);
            commitments.push(Commitment {
                participant_id: ParticipantId::new(format!("p{p}")),
                meeting_id: MeetingId::new(format!("p{p}-m{n}")),
                meeting_title: format!("Meeting {n}"),
                interval: TimeInterval {
                    start,
                    end: start + Duration::minutes(30),
                },
            });
        }
    }

    let window = TimeInterval {
        start: base + Duration::hours(20),
        end: base + Duration::hours(26),
    };
    (ConflictQuery::new(people, window), commitments)
}

fn bench_detect(c: &mut Criterion) {
    let (query, commitments) = workload(50, 200);
    c.bench_function("detect_50x200", |b| {
        b.iter(|| detect(black_box(&query), black_box(&commitments)))
    });

    let (query, commitments) = workload(5, 20);
    c.bench_function("detect_5x20", |b| {
        b.iter(|| detect(black_box(&query), black_box(&commitments)))
    });
}

criterion_group!(benches, bench_detect);
criterion_main!(benches);
