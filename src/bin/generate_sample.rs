//! Writes sample inputs for both dashboards:
//! `sample_data/dashboard_sample.xlsx` (chart gallery) and
//! `sample_data/cleaned/*.csv` (health overview).

use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform in `[lo, hi)`.
    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

fn header(sheet: &mut Worksheet, names: &[&str]) -> Result<()> {
    for (col, name) in names.iter().enumerate() {
        sheet.write_string(0, col as u16, *name)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Chart gallery workbook
// ---------------------------------------------------------------------------

fn write_gallery(path: &Path, rng: &mut SimpleRng) -> Result<()> {
    let mut book = Workbook::new();

    let bar = book.add_worksheet().set_name("바차트_히스토그램")?;
    header(bar, &["월", "총 매출"])?;
    for m in 1..=12u32 {
        bar.write_string(m, 0, format!("2024-{m:02}-01"))?;
        bar.write_number(m, 1, rng.range(800.0, 1500.0).round())?;
    }

    let line = book.add_worksheet().set_name("시계열차트")?;
    header(line, &["날짜", "방문자수"])?;
    let mut visitors = 500.0;
    for m in 1..=24u32 {
        visitors += rng.range(-40.0, 60.0);
        let (year, month) = (2023 + (m - 1) / 12, (m - 1) % 12 + 1);
        line.write_string(m, 0, format!("{year}-{month:02}-15"))?;
        line.write_number(m, 1, visitors.round())?;
    }

    let pie = book.add_worksheet().set_name("파이차트")?;
    header(pie, &["채널", "비율"])?;
    for (row, (label, share)) in [("온라인", 42.0), ("매장", 31.0), ("전화", 15.0), ("기타", 12.0)]
        .iter()
        .enumerate()
    {
        pie.write_string(row as u32 + 1, 0, *label)?;
        pie.write_number(row as u32 + 1, 1, *share)?;
    }

    let scatter = book.add_worksheet().set_name("산점도")?;
    header(scatter, &["광고비", "매출"])?;
    for row in 1..=40u32 {
        let spend = rng.range(10.0, 100.0);
        scatter.write_number(row, 0, (spend * 10.0).round() / 10.0)?;
        scatter.write_number(row, 1, (spend * 3.2 + rng.range(-30.0, 30.0)).round())?;
    }

    let pareto = book.add_worksheet().set_name("파레토차트")?;
    header(pareto, &["불량유형", "건수"])?;
    for (row, label) in ["스크래치", "찍힘", "오염", "치수불량", "도장불량", "기타"]
        .iter()
        .enumerate()
    {
        pareto.write_string(row as u32 + 1, 0, *label)?;
        pareto.write_number(row as u32 + 1, 1, rng.range(5.0, 120.0).round())?;
    }

    book.save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Health overview CSV folder
// ---------------------------------------------------------------------------

fn write_csv(dir: &Path, name: &str, header: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
    let path = dir.join(format!("{name}.csv"));
    let mut writer =
        csv::Writer::from_path(&path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_health(dir: &Path, rng: &mut SimpleRng) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let regions = ["종로구", "중구", "용산구", "성동구", "광진구", "동대문구", "중랑구", "성북구", "강북구", "도봉구", "노원구", "은평구"];
    write_csv(
        dir,
        "등록관리율",
        &["지역명", "추계중증정신질환자수 대비 정신건강복지센터 등록 중증정신질환자"],
        regions
            .iter()
            .map(|r| vec![r.to_string(), format!("{:.1}", rng.range(10.0, 45.0))])
            .collect(),
    )?;
    write_csv(
        dir,
        "기관현황",
        &["지역명", "합계"],
        regions
            .iter()
            .map(|r| vec![r.to_string(), format!("{}", rng.range(3.0, 30.0) as u32)])
            .collect(),
    )?;
    write_csv(
        dir,
        "예산",
        &["연도", "보건 예산 대비 정신건강증진 예산 비중"],
        (2018..=2023)
            .map(|y| vec![y.to_string(), format!("{:.2}", rng.range(1.2, 2.4))])
            .collect(),
    )?;

    let diseases = ["우울증", "불안장애", "불면증", "조현병", "양극성장애", "알코올사용장애", "공황장애"];
    let mut visits = Vec::new();
    for year in 2022..=2023 {
        for month in 1..=12 {
            for (i, d) in diseases.iter().enumerate() {
                let base = 20_000.0 / (i as f64 + 1.0);
                visits.push(vec![
                    format!("{year}-{month:02}"),
                    d.to_string(),
                    format!("{}", (base * rng.range(0.9, 1.1)) as u64),
                ]);
            }
        }
    }
    write_csv(dir, "진료정보", &["진료년월", "주상병명", "진료인원(명)"], visits)?;

    let mut groups = Vec::new();
    for year in 2018..=2023 {
        for group in ["기분장애", "불안장애", "정신병적장애"] {
            groups.push(vec![
                year.to_string(),
                group.to_string(),
                format!("{}", rng.range(80_000.0, 160_000.0) as u64),
            ]);
        }
    }
    write_csv(dir, "상병그룹", &["진료년도", "상병그룹", "진료실인원(명)"], groups)?;

    write_csv(
        dir,
        "주관적건강",
        &["연도", "좋은편", "보통", "좋지않은편"],
        (2018..=2023)
            .map(|y| {
                let good = rng.range(30.0, 45.0);
                let bad = rng.range(10.0, 20.0);
                vec![
                    y.to_string(),
                    format!("{good:.1}"),
                    format!("{:.1}", 100.0 - good - bad),
                    format!("{bad:.1}"),
                ]
            })
            .collect(),
    )?;

    let mut alcohol = Vec::new();
    for year in 2018..=2023 {
        alcohol.push(vec![year.to_string(), "사망자수".into(), format!("{}", rng.range(250.0, 350.0) as u32)]);
        alcohol.push(vec![year.to_string(), "사망률".into(), format!("{:.1}", rng.range(2.5, 3.6))]);
    }
    write_csv(dir, "알코올사망", &["연도", "구분", "계"], alcohol)?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let out = Path::new("sample_data");
    std::fs::create_dir_all(out).context("creating sample_data")?;

    let workbook = out.join("dashboard_sample.xlsx");
    write_gallery(&workbook, &mut rng)?;
    println!("Wrote {}", workbook.display());

    let health = out.join("cleaned");
    write_health(&health, &mut rng)?;
    println!("Wrote {}", health.display());
    Ok(())
}
