use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dscript_parser::{parse_file, ParserOptions};

// A medium-size dscript source with the usual constructs
const DSCRIPT_SOURCE: &str = r#"
import * as strings from "lib/strings"
import "lib/polyfills"

// [sealed]
export interface User {
    id: number
    name: string
    email?: string
    tags: Map<string, string[]>
}

type UserId = number | string

export enum Role {
    Guest,
    Member = 10,
    Admin,
}

// [cached]
export class UserStore implements Store<User> {
    private users: User[] = []
    private nextId = 1

    get count(): number {
        return this.users.length
    }

    add(name: string, email?: string): User {
        let user = { id: this.nextId, name: name, email: email, tags: {} }
        this.nextId += 1
        this.users.push(user)
        return user
    }

    find(predicate: (u: User) => boolean): User {
        for (let user of this.users) {
            if (predicate(user)) {
                return user
            }
        }
        return null
    }
}

export function fib(n: number, a: number, b: number): number {
    if (n == 0) {
        return a
    }
    return fib(n - 1, b, a + b)
}

function describe(role: Role): string {
    switch (role) {
        case Role.Guest:
            return "guest"
        case Role.Member:
        case Role.Admin:
            return strings.format("member %d", role)
        default:
            throw new Error("unknown role")
    }
}

export function main(...args: string[]) {
    let store = new UserStore()
    for (let i = 0; i < 100; i++) {
        store.add("user" + i, i % 2 == 0 ? "u" + i + "@example.com" : undefined)
    }
    let admin = store.find(u => u.id == 1)
    let masks = [0x0F, 0xF0 >> 2, 1 << 4]
    outer: while (true) {
        try {
            console.log(describe(Role.Admin), admin?.name, masks[0])
            break outer
        } catch (e: any) {
            continue
        } finally {
            store = null
        }
    }
}
"#;

fn bench_parse_file(c: &mut Criterion) {
    c.bench_function("parse_file", |b| {
        b.iter(|| parse_file(black_box(DSCRIPT_SOURCE), "bench.ts", ParserOptions::default()))
    });
}

fn bench_parse_file_optimized(c: &mut Criterion) {
    let options = ParserOptions { optimizations: true };
    c.bench_function("parse_file_optimized", |b| {
        b.iter(|| parse_file(black_box(DSCRIPT_SOURCE), "bench.ts", options))
    });
}

criterion_group!(benches, bench_parse_file, bench_parse_file_optimized);
criterion_main!(benches);
