use criterion::{Criterion, black_box, criterion_group, criterion_main};

use saas_auth::{Action, AuthUser, ProjectSubject, Role, SubjectInstance, SubjectKind, define_ability_for};
use saas_core::{OrganizationId, ProjectId, UserId};

fn bench_define_ability(c: &mut Criterion) {
    let user = AuthUser::new(UserId::new(), Role::Member);

    c.bench_function("define_ability_for/member", |b| {
        b.iter(|| define_ability_for(black_box(&user)))
    });
}

fn bench_queries(c: &mut Criterion) {
    let user = AuthUser::new(UserId::new(), Role::Admin);
    let ability = define_ability_for(&user).expect("admin is defined");
    let project = SubjectInstance::Project(ProjectSubject {
        id: ProjectId::new(),
        owner_id: UserId::new(),
        organization_id: OrganizationId::new(),
    });

    let mut group = c.benchmark_group("ability_queries");
    group.bench_function("can/bare_kind", |b| {
        b.iter(|| ability.can(black_box(Action::Create), black_box(SubjectKind::Invite)))
    });
    group.bench_function("can/instance", |b| {
        b.iter(|| ability.can(black_box(Action::Delete), black_box(&project)))
    });
    group.finish();
}

criterion_group!(benches, bench_define_ability, bench_queries);
criterion_main!(benches);
