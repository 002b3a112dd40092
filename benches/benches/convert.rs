//! Conversion throughput in both directions.

use codeshift::{Converter, ConvertConfig, convert};
use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};

const CSHARP_SOURCE: &str = r#"
namespace Tools.Logging
{
    class Logger
    {
        public void Write(string path, string message, bool append)
        {
            if (append)
            {
                File.AppendAllText(path, message);
            }
            else if (message == null)
            {
                return;
            }
            else
            {
                File.WriteAllText(path, message);
            }
            for (int i = 0; i < 3; i++)
            {
                Console.WriteLine(i);
            }
        }
    }
}
"#;

const POWERSHELL_SOURCE: &str = r#"
function Write-Log
{
    param([string]$Path, [string]$Message)
    if ($Message -eq $null) {
        return
    } elseif ($Path -ne '') {
        Add-Content -Path $Path -Value $Message
    } else {
        Write-Host "no path"
    }
    foreach ($item in $items) {
        $total += $item
    }
}
"#;

fn bench_convert(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert");

    group.throughput(Throughput::Bytes(CSHARP_SOURCE.len() as u64));
    group.bench_function("csharp_to_powershell", |b| {
        b.iter(|| convert(black_box(CSHARP_SOURCE), "csharp", "powershell"))
    });

    group.throughput(Throughput::Bytes(POWERSHELL_SOURCE.len() as u64));
    group.bench_function("powershell_to_csharp", |b| {
        b.iter(|| convert(black_box(POWERSHELL_SOURCE), "powershell", "csharp"))
    });

    let literal = Converter::new(ConvertConfig {
        recognize_intents: false,
        ..ConvertConfig::default()
    });
    group.bench_function("powershell_to_csharp_literal", |b| {
        b.iter(|| literal.convert(black_box(POWERSHELL_SOURCE), "powershell", "csharp"))
    });

    group.finish();
}

criterion_group!(benches, bench_convert);
criterion_main!(benches);
