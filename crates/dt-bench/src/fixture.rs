use std::fs;
use std::io;
use std::path::Path;

/// Typed module exercising every documentable shape.
pub const TS_MODULE: &str = r#"import { EventEmitter } from "events";

export interface Config {
  host: string;
  port: number;
}

export enum StatusCode {
  OK = 200,
  NotFound = 404,
}

export abstract class Service<T> extends EventEmitter implements Disposable {
  protected readonly items: T[] = [];

  constructor(private config: Config) {
    super();
  }

  get size(): number {
    return this.items.length;
  }

  static create(config: Config): Service<unknown> {
    throw new Error("abstract");
  }

  async *drain(limit = 10): AsyncGenerator<T> {
    while (this.items.length > 0 && limit-- > 0) {
      yield this.items.pop() as T;
    }
  }

  abstract dispose(): void;
}

export const handler = async ({ id, name }: { id: string; name: string }, ...rest: unknown[]): Promise<void> => {
  if (!id) {
    throw new TypeError(name);
  }
};
"#;

/// Untyped module with the constructs plain JavaScript allows.
pub const JS_MODULE: &str = r#"const DEFAULT_PORT = 8080;

function createServer(host, port = DEFAULT_PORT) {
  return { host, port };
}

class Router {
  constructor(routes) {
    this.routes = routes;
  }

  handle(request, ...middleware) {
    return this.routes[request.path];
  }

  *entries() {
    yield* Object.entries(this.routes);
  }
}

const toJson = (value) => JSON.stringify(value);

module.exports = { createServer, Router, toJson };
"#;

/// Number of documentable constructs a fresh sweep of `JS_MODULE` documents.
pub const JS_MODULE_TARGETS: usize = 6;

/// Write a small JS/TS project under `root`.
pub fn create_project(root: &Path) -> io::Result<()> {
    let src = root.join("src");
    fs::create_dir_all(&src)?;
    fs::write(src.join("service.ts"), TS_MODULE)?;
    fs::write(src.join("server.js"), JS_MODULE)?;
    fs::write(
        src.join("App.tsx"),
        "export function App({ title }: { title: string }): JSX.Element {\n  return <h1>{title}</h1>;\n}\n",
    )?;
    Ok(())
}

/// A TypeScript module with `functions` top-level functions and a class of
/// `functions` methods, for throughput measurements.
pub fn generated_module(functions: usize) -> String {
    let mut out = String::with_capacity(functions * 160);
    for i in 0..functions {
        out.push_str(&format!(
            "export function handler{i}(request: Request, retries = {i}): Promise<Response> {{\n  return fetch(request);\n}}\n\n"
        ));
    }
    out.push_str("export class Registry {\n");
    for i in 0..functions {
        out.push_str(&format!(
            "  lookup{i}(key: string, fallback?: number): number | undefined {{\n    return fallback;\n  }}\n\n"
        ));
    }
    out.push_str("}\n");
    out
}
