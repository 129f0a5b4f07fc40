use adl_ast::types::ParseOptions;
use adl_core::arena::CompilerArena;
use adl_parser::parse;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

// A medium-size ADL source (~80 lines) with various constructs
const ADL_SOURCE: &str = r#"
import "./library.adl";

namespace PetStore.Api;

using Common.Types;

@tag("pets")
@route("/pets")
interface Pets {
  op list(filter?: string, ...PageOptions): Pet[];
  op read(id: int64): Pet | NotFound;
  create(pet: Pet): Pet;
  remove(id: int64): void;
}

/**
 * A pet in the store.
 * @param name the display name
 */
@doc("A pet")
model Pet {
  id: int64;
  name: string;
  tag?: string = "none";
  kind: PetKind;
  owner?: Person;
}

model Person {
  name: string;
  address: { street: string, city: string };
}

model PagedResult<T> {
  items: T[];
  nextLink?: url;
}

model PageOptions {
  top?: int32 = 25;
  skip?: int32;
}

scalar url extends string;

enum PetKind {
  dog,
  cat,
  other: "unknown",
}

union Outcome {
  ok: Pet,
  notFound: NotFound,
}

model NotFound {
  code: "NOT_FOUND";
}

alias PetPage = PagedResult<Pet>;

op readOrDefault is Pets.read;

@@doc(Person, "Somebody who owns a pet");

extern dec route(target: unknown, path: string);
extern fn concat(...parts: string[]): string;

projection model#v1 {
  to(version) {
    if version > 1 {
      self::rename(concatIds("v", version));
    };
  }
  from {
    return self;
  }
}
"#;

fn bench_parse_adl(c: &mut Criterion) {
    c.bench_function("parse_adl_medium", |b| {
        b.iter(|| {
            let arena = CompilerArena::new();
            let script = parse(
                &arena,
                black_box(ADL_SOURCE),
                ParseOptions {
                    comments: true,
                    docs: true,
                },
            );
            black_box(script.statements.len());
        });
    });
}

criterion_group!(benches, bench_parse_adl);
criterion_main!(benches);
