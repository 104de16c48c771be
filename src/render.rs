use crate::types::Pattern;

const MAX_WIDTH: f64 = 80.0;

/// Draws the pattern as a three-line bar, one box per cut, with the leftover
/// shaded by `.`.
pub fn render_pattern(stock_length: u32, pattern: &Pattern) -> String {
    if stock_length == 0 {
        return String::new();
    }
    let scale = MAX_WIDTH / stock_length as f64;
    let grid_w = (stock_length as f64 * scale).round() as usize;

    let mut grid = vec![vec![' '; grid_w + 1]; 3];

    let mut offset: u64 = 0;
    for &cut in pattern.cuts() {
        let sx = ((offset as f64 * scale).round() as usize).min(grid_w);
        offset += cut as u64;
        let ex = ((offset as f64 * scale).round() as usize).min(grid_w);

        draw_box(&mut grid, sx, ex);

        let label: Vec<char> = cut.to_string().chars().collect();
        let inner = ex.saturating_sub(sx + 1);
        if label.len() <= inner {
            let start = sx + 1 + (inner - label.len()) / 2;
            for (i, &ch) in label.iter().enumerate() {
                grid[1][start + i] = ch;
            }
        }
    }

    let used = ((offset as f64 * scale).round() as usize).min(grid_w);
    if used < grid_w {
        draw_box(&mut grid, used, grid_w);
        for row in grid.iter_mut() {
            for cell in &mut row[used + 1..grid_w] {
                *cell = '.';
            }
        }
    }

    let mut result = String::new();
    for row in &grid {
        let line: String = row.iter().collect();
        result.push_str(line.trim_end());
        result.push('\n');
    }
    result
}

fn draw_box(grid: &mut [Vec<char>], x0: usize, x1: usize) {
    for x in x0..=x1 {
        if grid[0][x] != '+' {
            grid[0][x] = '-';
        }
        if grid[2][x] != '+' {
            grid[2][x] = '-';
        }
    }
    for &x in &[x0, x1] {
        grid[0][x] = '+';
        grid[1][x] = '|';
        grid[2][x] = '+';
    }
}
