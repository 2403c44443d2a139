mod scenario;
mod simulation;
