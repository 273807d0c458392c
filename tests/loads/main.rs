mod families;
mod generation;
